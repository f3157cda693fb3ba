//! Authentication test helpers
//!
//! Fixtures for users, sessions, token-endpoint payloads and storage seeded
//! with the artifacts a signed-in client leaves behind.

use std::sync::Arc;
use std::time::Duration;
use trashdrop::client::{AuthManager, CapabilityHandle, MockAuthProvider};
use trashdrop::shared::storage::{store_session_artifacts, MemoryStorage};
use trashdrop::shared::{Session, User};

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";
pub const TEST_API_KEY: &str = "anon-test-key";

pub fn test_user() -> User {
    serde_json::from_value(serde_json::json!({
        "id": "11111111-2222-4333-8444-555555555555",
        "email": TEST_EMAIL,
        "user_metadata": { "role": "customer" }
    }))
    .expect("fixture user is valid")
}

pub fn test_session() -> Session {
    Session {
        access_token: "access-abc".to_string(),
        refresh_token: "refresh-xyz".to_string(),
        user: test_user(),
        expires_at: None,
    }
}

/// Body of a successful password grant
pub fn token_response() -> serde_json::Value {
    serde_json::json!({
        "access_token": "access-abc",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "refresh-xyz",
        "user": {
            "id": "11111111-2222-4333-8444-555555555555",
            "email": TEST_EMAIL,
            "user_metadata": { "role": "customer" }
        }
    })
}

/// Local storage holding every auth artifact plus an unrelated preference
pub fn signed_in_local_storage() -> Arc<MemoryStorage> {
    let store = Arc::new(MemoryStorage::with_entries([("theme", "dark")]));
    store_session_artifacts(store.as_ref(), &test_session(), true).expect("memory store never fails");
    store
}

/// Facade over a zero-latency mock provider
pub fn mock_auth_manager() -> (AuthManager, Arc<MockAuthProvider>) {
    let mock = Arc::new(MockAuthProvider::with_latency(Duration::ZERO));
    let handle = CapabilityHandle::with_capability(mock.clone());
    (AuthManager::new(handle), mock)
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
