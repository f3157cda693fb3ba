//! Session facade over the auth capability.
//!
//! `AuthManager` is what page code talks to. Its queries never fail outward:
//! any capability error is logged and read as "not signed in".

use crate::client::capability::{AuthCapability, CapabilityHandle};
use crate::shared::config::DEFAULT_CAPABILITY_TIMEOUT;
use crate::shared::error::AuthError;
use crate::shared::session::User;
use std::sync::Arc;
use std::time::Duration;

/// How often `initialize` checks the handle
pub const CAPABILITY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct AuthManager {
    handle: CapabilityHandle,
    poll_interval: Duration,
    timeout: Duration,
}

impl AuthManager {
    pub fn new(handle: CapabilityHandle) -> Self {
        Self {
            handle,
            poll_interval: CAPABILITY_POLL_INTERVAL,
            timeout: DEFAULT_CAPABILITY_TIMEOUT,
        }
    }

    /// Override the bound on `initialize`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wait until the capability handle is filled.
    ///
    /// Returns `CapabilityTimeout` if nothing is installed in time; callers
    /// should treat that as fatal for the page.
    pub async fn initialize(&self) -> Result<(), AuthError> {
        match self.handle.wait_ready(self.poll_interval, self.timeout).await {
            Ok(capability) => {
                tracing::info!("AuthManager ready ({} capability)", capability.name());
                Ok(())
            }
            Err(e) => {
                tracing::error!("AuthManager initialization failed: {}", e);
                Err(e)
            }
        }
    }

    fn capability(&self) -> Result<Arc<dyn AuthCapability>, AuthError> {
        self.handle.get().ok_or(AuthError::CapabilityUnavailable)
    }

    /// Whether a session is currently held. Never fails.
    pub async fn is_authenticated(&self) -> bool {
        let capability = match self.capability() {
            Ok(capability) => capability,
            Err(e) => {
                tracing::warn!("Error checking authentication: {}", e);
                return false;
            }
        };

        match capability.get_session().await {
            Ok(session) => session.is_some(),
            Err(e) => {
                tracing::warn!("Error checking authentication: {}", e);
                false
            }
        }
    }

    /// Current user, or `None` if signed out or the lookup failed
    pub async fn get_current_user(&self) -> Option<User> {
        let capability = match self.capability() {
            Ok(capability) => capability,
            Err(e) => {
                tracing::warn!("Error getting current user: {}", e);
                return None;
            }
        };

        match capability.get_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("Error getting current user: {}", e);
                None
            }
        }
    }

    /// Request sign-out. The error is returned, never raised.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let result = match self.capability() {
            Ok(capability) => capability.sign_out().await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            tracing::warn!("Error signing out: {}", e);
        }
        result
    }
}
