/**
 * Token Diagnostics
 *
 * Manual troubleshooting aid: inspects the access token stored locally and
 * tries one authenticated request with it. Nothing here is on the runtime
 * auth path and nothing is propagated as an error; every finding lands in
 * the returned `DiagnosticReport`.
 */

use crate::shared::storage::{KeyValueStore, TOKEN_KEY};
use crate::shared::token::{decode_claims, TokenClaims};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

/// Profile endpoint exercised with the stored token
pub const PROFILE_PATH: &str = "/api/profile";

/// Result of the authenticated profile request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProfileCheck {
    /// No token to send
    Skipped,
    Succeeded { status: u16, body: serde_json::Value },
    Failed { status: Option<u16>, message: String },
}

impl ProfileCheck {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub token_present: bool,
    pub claims: Option<TokenClaims>,
    pub decode_error: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub expired: Option<bool>,
    pub profile: ProfileCheck,
}

pub struct TokenDiagnostics {
    storage: Arc<dyn KeyValueStore>,
    http: Client,
    profile_url: String,
}

impl TokenDiagnostics {
    pub fn new(storage: Arc<dyn KeyValueStore>, server_url: &str) -> Self {
        Self {
            storage,
            http: Client::new(),
            profile_url: format!("{}{}", server_url.trim_end_matches('/'), PROFILE_PATH),
        }
    }

    pub async fn run(&self) -> DiagnosticReport {
        self.run_at(Utc::now()).await
    }

    /// Run with an explicit "now" for the expiry check
    pub async fn run_at(&self, now: DateTime<Utc>) -> DiagnosticReport {
        let Some(token) = self.storage.get(TOKEN_KEY) else {
            tracing::warn!("No token found in local storage");
            return DiagnosticReport {
                token_present: false,
                claims: None,
                decode_error: None,
                expires_at: None,
                expired: None,
                profile: ProfileCheck::Skipped,
            };
        };

        let (claims, decode_error) = match decode_claims(&token) {
            Ok(claims) => {
                tracing::info!(
                    "Token payload: sub={} role={:?} iat={:?} exp={:?}",
                    claims.sub,
                    claims.role,
                    claims.iat,
                    claims.exp
                );
                (Some(claims), None)
            }
            Err(e) => {
                tracing::warn!("Failed to decode stored token: {}", e);
                (None, Some(e.to_string()))
            }
        };

        let expires_at = claims.as_ref().and_then(TokenClaims::expires_at);
        let expired = claims.as_ref().map(|c| c.is_expired(now));
        match expired {
            Some(true) => tracing::warn!("Token expired at {:?}", expires_at),
            Some(false) => tracing::info!("Token valid until {:?}", expires_at),
            None => {}
        }

        let profile = self.check_profile(&token).await;

        DiagnosticReport {
            token_present: true,
            claims,
            decode_error,
            expires_at,
            expired,
            profile,
        }
    }

    async fn check_profile(&self, token: &str) -> ProfileCheck {
        let response = match self.http.get(&self.profile_url).bearer_auth(token).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Profile request failed: {}", e);
                return ProfileCheck::Failed {
                    status: None,
                    message: e.to_string(),
                };
            }
        };

        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        if status.is_success() {
            tracing::info!("Profile request succeeded ({})", status);
            let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text));
            ProfileCheck::Succeeded {
                status: status.as_u16(),
                body,
            }
        } else {
            tracing::warn!("Profile request rejected ({})", status);
            ProfileCheck::Failed {
                status: Some(status.as_u16()),
                message: if text.is_empty() { status.to_string() } else { text },
            }
        }
    }
}
