//! Session and user types shared by every auth capability.
//!
//! These are plain data: the client only ever holds read-only copies handed
//! out by a capability. A `Session` always carries its `User`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An authenticated user as reported by the auth backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Backend user id
    pub id: String,
    /// Account email
    pub email: String,
    /// Free-form profile data (role, display name, ...)
    #[serde(default, alias = "user_metadata")]
    pub metadata: Map<String, Value>,
}

impl User {
    /// Convenience accessor for a string metadata entry
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

/// A live session: tokens plus the user they belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Whether the access token is past its expiry (sessions without one never expire)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

/// Email/password pair for password sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Result payload of a successful password sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct SignInData {
    pub user: User,
    pub session: Session,
}

/// Auth state transitions delivered to `on_auth_state_change` listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}
