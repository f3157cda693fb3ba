//! Shared Error Types
//!
//! This module defines error types that are shared between the client and backend.
//! These errors represent common failure cases that can occur in both contexts.
//!
//! # Error Categories
//!
//! - `SharedError` - serialization, validation and local storage failures
//! - `AuthError` - failures reported by an auth capability (remote or mock)
//!
//! # Usage
//!
//! ```rust
//! use trashdrop::shared::error::{AuthError, SharedError};
//!
//! // Create a validation error
//! let error = SharedError::validation("email", "Email cannot be empty");
//!
//! // Auth failures are plain values that callers branch on
//! let auth = AuthError::remote(503, "upstream unavailable");
//! assert!(matches!(auth, AuthError::Remote { status: 503, .. }));
//! ```
//!
//! # Thread Safety
//!
//! All error types are `Send + Sync` and can be safely shared across thread boundaries.
use std::time::Duration;
use thiserror::Error;

/// Shared error types that can occur in both client and backend
#[derive(Debug, Error, Clone)]
pub enum SharedError {
    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Human-readable error message
        message: String,
    },

    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Local key/value storage error (file I/O, poisoned lock)
    #[error("Storage error: {message}")]
    StorageError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::SerializationError {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }
}

/// Helper trait for converting serialization errors
impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for SharedError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(format!("I/O error: {}", err))
    }
}

/// Errors reported by an auth capability.
///
/// Capability operations never unwind into callers; every failure is one of
/// these values so that UI code can branch on it directly.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AuthError {
    /// Email/password pair did not match any account
    #[error("Invalid login credentials")]
    InvalidCredentials,

    /// Operation needs a session but none is held
    #[error("No active session")]
    NotAuthenticated,

    /// No capability has been installed in the handle yet
    #[error("Auth capability is not available")]
    CapabilityUnavailable,

    /// The capability never appeared within the configured wait
    #[error("Auth capability did not become available within {waited:?}")]
    CapabilityTimeout {
        /// How long the caller waited
        waited: Duration,
    },

    /// The handle already holds a capability; handles are set once
    #[error("Auth capability is already installed")]
    CapabilityAlreadyInstalled,

    /// Transport-level failure talking to the auth service
    #[error("Network error: {message}")]
    Network {
        /// Human-readable error message
        message: String,
    },

    /// The auth service answered with a non-success status
    #[error("Auth service returned {status}: {message}")]
    Remote {
        /// HTTP status code
        status: u16,
        /// Message extracted from the response body
        message: String,
    },

    /// Token could not be encoded or decoded
    #[error("Token error: {message}")]
    Token {
        /// Human-readable error message
        message: String,
    },
}

impl AuthError {
    /// Create a new network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a new remote error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }

    /// Create a new token error
    pub fn token(message: impl Into<String>) -> Self {
        Self::Token {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::remote(status.as_u16(), err.to_string()),
            None => Self::network(err.to_string()),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::token(err.to_string())
    }
}
