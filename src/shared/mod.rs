//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the client tooling and the backend: session/user data, token claims,
//! client-local storage, configuration and error types.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. Session types are designed for
//! serialization so they can be cached in local storage or read from the
//! auth service's JSON responses.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Session, user and credential types
pub mod session;

/// Client-local key/value storage and persisted auth artifacts
pub mod storage;

/// Token claim decoding
pub mod token;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{AuthError, SharedError};
pub use session::{AuthChangeEvent, Credentials, Session, SignInData, User};
pub use storage::{FileStorage, KeyValueStore, MemoryStorage, AUTH_ARTIFACT_KEYS};
pub use token::{decode_claims, TokenClaims};
