/**
 * Backend Error Types
 *
 * Errors raised while serving requests or bootstrapping the server.
 *
 * - `HandlerError` - request-level failures with an explicit status
 * - `ConfigError` - server configuration is invalid
 * - `IoError` - the listener could not be bound or served
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::ConfigError;

/// Backend-specific error types
///
/// ```rust
/// use axum::http::StatusCode;
/// use trashdrop::backend::error::BackendError;
///
/// let err = BackendError::handler(StatusCode::NOT_FOUND, "No route for /metrics");
/// assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error (e.g. unknown route)
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Configuration error
    #[error(transparent)]
    ConfigError(#[from] ConfigError),

    /// Socket error while binding or serving
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// - `HandlerError` - the status carried by the error
    /// - everything else - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::ConfigError(_) | Self::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. } => message.clone(),
            Self::ConfigError(err) => err.to_string(),
            Self::IoError(err) => err.to_string(),
        }
    }
}
