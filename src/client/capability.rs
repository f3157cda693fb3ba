//! Auth Capability
//!
//! The set of auth operations every backend offers (hosted service or the
//! in-memory mock), plus the set-once handle components receive it through.
//!
//! # Handle semantics
//!
//! A [`CapabilityHandle`] starts empty and is filled exactly once. Every
//! component that needs auth is constructed with a clone of the same handle,
//! so the capability may be installed after the components exist; they
//! check for it (or wait for it with a bound) instead of reading a global.

use crate::client::mock_auth::MockAuthProvider;
use crate::shared::error::AuthError;
use crate::shared::session::{AuthChangeEvent, Credentials, Session, SignInData, User};
use async_trait::async_trait;
use std::sync::{Arc, Mutex, OnceLock, Weak};
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use uuid::Uuid;

/// Listener invoked on auth state transitions
pub type AuthStateCallback = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;

type ListenerList = Mutex<Vec<(Uuid, AuthStateCallback)>>;

/// Operations exposed by an identity provider client
#[async_trait]
pub trait AuthCapability: Send + Sync {
    /// Sign in with email and password
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<SignInData, AuthError>;

    /// End the current session
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Current session, if any
    async fn get_session(&self) -> Result<Option<Session>, AuthError>;

    /// Current user, if any
    async fn get_user(&self) -> Result<Option<User>, AuthError>;

    /// Register a listener for auth state transitions
    fn on_auth_state_change(&self, callback: AuthStateCallback) -> Subscription;

    /// Short backend name used in logs
    fn name(&self) -> &'static str;
}

/// Handle returned by `on_auth_state_change`.
///
/// The listener stays registered while the handle is alive; dropping it
/// unsubscribes.
#[derive(Debug)]
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: Uuid,
    listeners: Weak<ListenerList>,
}

impl Subscription {
    /// A subscription that is not attached to any listener list
    pub fn detached() -> Self {
        Self {
            id: Uuid::new_v4(),
            listeners: Weak::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Stop receiving events
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            let mut listeners = listeners.lock().unwrap_or_else(|e| e.into_inner());
            listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Registered auth state listeners
#[derive(Clone, Default)]
pub struct AuthListeners {
    inner: Arc<ListenerList>,
}

impl AuthListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: AuthStateCallback) -> Subscription {
        let id = Uuid::new_v4();
        let mut listeners = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        listeners.push((id, callback));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.inner),
        }
    }

    /// Invoke every listener. Callbacks run outside the lock so they may
    /// subscribe or unsubscribe.
    pub fn notify(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let snapshot: Vec<AuthStateCallback> = {
            let listeners = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            listeners.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        tracing::debug!("Notifying {} auth listener(s) of {:?}", snapshot.len(), event);
        for callback in snapshot {
            callback(event, session);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Set-once slot holding the active auth capability
#[derive(Clone, Default)]
pub struct CapabilityHandle {
    slot: Arc<OnceLock<Arc<dyn AuthCapability>>>,
}

impl CapabilityHandle {
    /// Empty handle; install a capability later
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that is ready from the start
    pub fn with_capability(capability: Arc<dyn AuthCapability>) -> Self {
        let handle = Self::new();
        // A fresh slot cannot already be set.
        let _ = handle.slot.set(capability);
        handle
    }

    /// Install the capability. Fails if one is already installed.
    pub fn install(&self, capability: Arc<dyn AuthCapability>) -> Result<(), AuthError> {
        let name = capability.name();
        self.slot.set(capability).map_err(|_| {
            tracing::warn!("Refusing to replace installed auth capability with {}", name);
            AuthError::CapabilityAlreadyInstalled
        })?;
        tracing::info!("Auth capability installed: {}", name);
        Ok(())
    }

    /// Install the in-memory mock unless a real capability is present.
    /// Returns whichever capability the handle holds afterwards.
    pub fn install_mock_if_absent(&self) -> Arc<dyn AuthCapability> {
        let capability = self.slot.get_or_init(|| {
            tracing::warn!("No auth capability available, installing mock provider");
            Arc::new(MockAuthProvider::new()) as Arc<dyn AuthCapability>
        });
        Arc::clone(capability)
    }

    pub fn get(&self) -> Option<Arc<dyn AuthCapability>> {
        self.slot.get().cloned()
    }

    pub fn is_ready(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Poll for the capability every `poll_interval` until it appears or
    /// `timeout` elapses.
    pub async fn wait_ready(
        &self,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Result<Arc<dyn AuthCapability>, AuthError> {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let poll = async {
            loop {
                ticker.tick().await;
                if let Some(capability) = self.get() {
                    return capability;
                }
            }
        };

        tokio::time::timeout(timeout, poll)
            .await
            .map_err(|_| AuthError::CapabilityTimeout { waited: timeout })
    }
}

impl std::fmt::Debug for CapabilityHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityHandle")
            .field("capability", &self.get().map(|c| c.name()))
            .finish()
    }
}
