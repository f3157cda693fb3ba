/**
 * Mock Auth Provider
 *
 * In-memory stand-in for the hosted auth service, installed when no real
 * capability is configured (local development, demos, tests).
 *
 * # Behaviour
 *
 * - A fixed roster of accounts; sign-in requires an exact email and
 *   password match.
 * - Sign-in waits a fixed simulated latency before answering.
 * - Everything handed out is a clone; callers cannot reach internal state.
 * - `on_auth_state_change` hands back a detached subscription. The mock
 *   never emits auth events.
 */

use crate::client::capability::{AuthCapability, AuthStateCallback, Subscription};
use crate::shared::error::AuthError;
use crate::shared::session::{Credentials, Session, SignInData, User};
use crate::shared::token::{issue_token, TokenClaims};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Map, Value};
use std::sync::RwLock;
use std::time::Duration;
use uuid::Uuid;

/// Simulated network latency for sign-in
pub const DEFAULT_MOCK_LATENCY: Duration = Duration::from_millis(500);

/// Lifetime of mock access tokens
const MOCK_TOKEN_TTL_SECS: i64 = 60 * 60;

/// HMAC key for mock tokens. Only the mock ever signs with it.
const MOCK_SIGNING_KEY: &[u8] = b"trashdrop-mock-signing-key";

/// One account in the mock roster
#[derive(Debug, Clone)]
pub struct MockAccount {
    pub id: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: &'static str,
    pub name: &'static str,
}

/// Accounts the mock provider accepts
pub const MOCK_ROSTER: &[MockAccount] = &[
    MockAccount {
        id: "00000000-0000-4000-8000-000000000001",
        email: "test@example.com",
        password: "password123",
        role: "customer",
        name: "Test User",
    },
    MockAccount {
        id: "00000000-0000-4000-8000-000000000002",
        email: "collector@trashdrop.app",
        password: "collector123",
        role: "collector",
        name: "Demo Collector",
    },
    MockAccount {
        id: "00000000-0000-4000-8000-000000000003",
        email: "admin@trashdrop.app",
        password: "admin123",
        role: "admin",
        name: "Demo Admin",
    },
];

impl MockAccount {
    fn to_user(&self) -> User {
        let mut metadata = Map::new();
        metadata.insert("role".to_string(), Value::String(self.role.to_string()));
        metadata.insert("name".to_string(), Value::String(self.name.to_string()));
        User {
            id: self.id.to_string(),
            email: self.email.to_string(),
            metadata,
        }
    }
}

/// In-memory auth capability
#[derive(Debug)]
pub struct MockAuthProvider {
    latency: Duration,
    session: RwLock<Option<Session>>,
}

impl Default for MockAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthProvider {
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_MOCK_LATENCY)
    }

    /// Mock with a custom simulated latency (tests use zero)
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            session: RwLock::new(None),
        }
    }

    fn find_account(credentials: &Credentials) -> Option<&'static MockAccount> {
        MOCK_ROSTER
            .iter()
            .find(|account| account.email == credentials.email && account.password == credentials.password)
    }

    fn open_session(account: &MockAccount) -> Result<Session, AuthError> {
        let now = Utc::now();
        let expires_at = now + ChronoDuration::seconds(MOCK_TOKEN_TTL_SECS);
        let claims = TokenClaims {
            sub: account.id.to_string(),
            email: Some(account.email.to_string()),
            role: Some(account.role.to_string()),
            iat: Some(now.timestamp()),
            exp: Some(expires_at.timestamp()),
        };
        Ok(Session {
            access_token: issue_token(&claims, MOCK_SIGNING_KEY)?,
            refresh_token: format!("mock-refresh-{}", Uuid::new_v4()),
            user: account.to_user(),
            expires_at: Some(expires_at),
        })
    }

    fn current(&self) -> Option<Session> {
        self.session.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl AuthCapability for MockAuthProvider {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<SignInData, AuthError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let account = Self::find_account(credentials).ok_or_else(|| {
            tracing::warn!("Mock sign-in rejected for {}", credentials.email);
            AuthError::InvalidCredentials
        })?;

        let session = Self::open_session(account)?;
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        tracing::info!("Mock sign-in succeeded for {}", account.email);

        Ok(SignInData {
            user: session.user.clone(),
            session,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.write().unwrap_or_else(|e| e.into_inner()) = None;
        tracing::info!("Mock session cleared");
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.current())
    }

    async fn get_user(&self) -> Result<Option<User>, AuthError> {
        Ok(self.current().map(|session| session.user))
    }

    fn on_auth_state_change(&self, _callback: AuthStateCallback) -> Subscription {
        tracing::debug!("Mock auth provider does not emit auth state events");
        Subscription::detached()
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
