//! TrashDrop - Session Toolkit
//!
//! Client-side authentication and session lifecycle for the TrashDrop
//! waste-collection app, the environment compatibility rules that run
//! before it, and a small health-check server.
//!
//! # Module Structure
//!
//! - **`shared`** - types shared by the client tooling and the server
//!   - Session, user and credential types
//!   - Token claims, local storage, configuration
//!   - Error types
//!
//! - **`client`** - auth/session lifecycle
//!   - Auth capability, hosted client and mock provider
//!   - Session facade and logout controller
//!   - Safari / loopback / tunnel compatibility rules
//!   - Token diagnostics
//!
//! - **`backend`** - health server (only compiled with the `server` feature)
//!   - `/healthz`, `/ready`, `/live`
//!
//! # Feature Flags
//!
//! - **`server`** (default) - enables the Axum backend and the
//!   `trashdrop-server` binary
//!
//! # Error Handling
//!
//! - `Result<T, E>` for fallible operations
//! - Custom error types in `shared::error`, `shared::config` and `backend::error`

/// Shared types and data structures
pub mod shared;

/// Client auth/session lifecycle
pub mod client;

/// Backend health server
#[cfg(feature = "server")]
pub mod backend;
