/**
 * Remote Auth Client
 *
 * HTTP client for the hosted identity service (GoTrue-style REST API).
 * Implements the same capability set as the mock provider.
 *
 * # Endpoints
 *
 * - `POST /auth/v1/token?grant_type=password` - password sign-in
 * - `POST /auth/v1/token?grant_type=refresh_token` - exchange the refresh token
 * - `POST /auth/v1/logout` - revoke the current session
 * - `GET /auth/v1/user` - current user for the held access token
 *
 * Every request carries the project's public `apikey` header; session
 * requests add `Authorization: Bearer <access token>`.
 */

use crate::client::capability::{AuthCapability, AuthListeners, AuthStateCallback, Subscription};
use crate::shared::error::AuthError;
use crate::shared::session::{AuthChangeEvent, Credentials, Session, SignInData, User};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

/// Token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self) -> Session {
        let expires_at = match (self.expires_at, self.expires_in) {
            (Some(ts), _) => Utc.timestamp_opt(ts, 0).single(),
            (None, Some(secs)) => Some(Utc::now() + ChronoDuration::seconds(secs)),
            (None, None) => None,
        };
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            user: self.user,
            expires_at,
        }
    }
}

/// Error bodies come in a few shapes depending on the endpoint
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self, status: StatusCode) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .or(self.error)
            .unwrap_or_else(|| status.to_string())
    }
}

async fn remote_error(response: Response) -> AuthError {
    let status = response.status();
    let body: ErrorBody = response.json().await.unwrap_or_default();
    AuthError::remote(status.as_u16(), body.into_message(status))
}

/// Capability backed by the hosted auth service
pub struct RemoteAuthClient {
    http: Client,
    base_url: String,
    api_key: String,
    session: RwLock<Option<Session>>,
    listeners: AuthListeners,
}

impl RemoteAuthClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    /// Use a preconfigured HTTP client (timeouts, proxies)
    pub fn with_client(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            session: RwLock::new(None),
            listeners: AuthListeners::new(),
        }
    }

    /// Start out holding `session`, typically read back from local storage
    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = RwLock::new(session);
        self
    }

    /// Adopt a session obtained earlier (e.g. read back from local storage)
    pub async fn restore_session(&self, session: Session) {
        *self.session.write().await = Some(session);
    }

    /// Exchange the held refresh token for a new session.
    ///
    /// A rejected refresh token ends the session: it is dropped, listeners
    /// see `SignedOut` and the call fails with `NotAuthenticated`.
    pub async fn refresh_session(&self) -> Result<Session, AuthError> {
        let refresh_token = self
            .session
            .read()
            .await
            .as_ref()
            .map(|session| session.refresh_token.clone())
            .ok_or(AuthError::NotAuthenticated)?;

        let response = self
            .request(self.http.post(self.endpoint("/token?grant_type=refresh_token")))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                tracing::warn!("Refresh token rejected; dropping session");
                *self.session.write().await = None;
                self.listeners.notify(AuthChangeEvent::SignedOut, None);
                return Err(AuthError::NotAuthenticated);
            }
            status if !status.is_success() => return Err(remote_error(response).await),
            _ => {}
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::remote(StatusCode::OK.as_u16(), format!("Malformed token response: {}", e)))?;
        let session = token.into_session();

        *self.session.write().await = Some(session.clone());
        tracing::info!("Session refreshed for {}", session.user.email);
        self.listeners.notify(AuthChangeEvent::TokenRefreshed, Some(&session));
        Ok(session)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header("apikey", &self.api_key)
    }

    async fn access_token(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }
}

#[async_trait]
impl AuthCapability for RemoteAuthClient {
    async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<SignInData, AuthError> {
        let url = self.endpoint("/token?grant_type=password");
        let response = self
            .request(self.http.post(&url))
            .json(credentials)
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                tracing::warn!("Sign-in rejected for {}", credentials.email);
                return Err(AuthError::InvalidCredentials);
            }
            status if !status.is_success() => return Err(remote_error(response).await),
            _ => {}
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::remote(StatusCode::OK.as_u16(), format!("Malformed token response: {}", e)))?;
        let session = token.into_session();

        *self.session.write().await = Some(session.clone());
        tracing::info!("Signed in as {}", session.user.email);
        self.listeners.notify(AuthChangeEvent::SignedIn, Some(&session));

        Ok(SignInData {
            user: session.user.clone(),
            session,
        })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if let Some(token) = self.access_token().await {
            let response = self
                .request(self.http.post(self.endpoint("/logout")))
                .bearer_auth(&token)
                .send()
                .await
                .map_err(|e| AuthError::network(e.to_string()))?;

            let status = response.status();
            // An unknown or expired session is already signed out remotely.
            if !status.is_success() && status != StatusCode::UNAUTHORIZED && status != StatusCode::NOT_FOUND {
                let err = remote_error(response).await;
                tracing::error!("Remote sign-out failed: {}", err);
                return Err(err);
            }
        }

        *self.session.write().await = None;
        tracing::info!("Signed out");
        self.listeners.notify(AuthChangeEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.session.read().await.clone())
    }

    async fn get_user(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.access_token().await else {
            return Ok(None);
        };

        let response = self
            .request(self.http.get(self.endpoint("/user")))
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AuthError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(remote_error(response).await);
        }

        let user: User = response
            .json()
            .await
            .map_err(|e| AuthError::remote(StatusCode::OK.as_u16(), format!("Malformed user response: {}", e)))?;
        Ok(Some(user))
    }

    fn on_auth_state_change(&self, callback: AuthStateCallback) -> Subscription {
        self.listeners.subscribe(callback)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
