/**
 * Access Token Claims
 *
 * Shared helpers for reading the payload of a bearer token on the client.
 * The client never holds the signing secret, so `decode_claims` only parses
 * the payload; the server remains the authority on validity.
 */

use crate::shared::error::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// JWT claims the client cares about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub sub: String,
    /// Email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Account role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Issued at time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration time (Unix timestamp)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|ts| Utc.timestamp_opt(ts, 0).single())
    }

    /// Tokens without an `exp` claim are reported as not expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map(|exp| exp <= now).unwrap_or(false)
    }
}

/// JOSE header fields read while decoding
#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

fn decode_segment<T: DeserializeOwned>(segment: &str, name: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| AuthError::token(format!("Invalid {} encoding: {}", name, e)))?;
    serde_json::from_slice(&bytes).map_err(|e| AuthError::token(format!("Invalid {} JSON: {}", name, e)))
}

/// Decode the payload of a JWT without verifying its signature.
///
/// Works for any signing algorithm (HS256, RS256, ES256, ...); the
/// signature segment must be present but is not inspected.
pub fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let mut segments = token.trim().split('.');
    let (Some(header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return Err(AuthError::token("Token must have three dot-separated segments"));
    };

    let header: TokenHeader = decode_segment(header, "header")?;
    tracing::debug!("Decoding {} token without signature check", header.alg);
    decode_segment(payload, "payload")
}

/// Sign `claims` with an HMAC secret (HS256)
pub fn issue_token(claims: &TokenClaims, secret: &[u8]) -> Result<String, AuthError> {
    Ok(encode(&Header::default(), claims, &EncodingKey::from_secret(secret))?)
}
