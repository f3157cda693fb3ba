//! Hosted auth client tests against a mock HTTP server

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use trashdrop::client::{AuthCapability, AuthManager, CapabilityHandle, RemoteAuthClient};
use trashdrop::shared::{AuthChangeEvent, AuthError, Credentials, Session};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use crate::common::{auth_header, test_session, test_user, token_response, TEST_API_KEY, TEST_EMAIL, TEST_PASSWORD};

async fn mount_token_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(header("apikey", TEST_API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sign_in_stores_session_and_notifies() {
    let server = MockServer::start().await;
    mount_token_ok(&server).await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    let _subscription = client.on_auth_state_change(Arc::new(
        move |event: AuthChangeEvent, session: Option<&Session>| {
            seen.lock().unwrap().push((event, session.map(|s| s.user.email.clone())));
        },
    ));

    let data = crate::assert_ok!(
        client
            .sign_in_with_password(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
            .await
    );

    assert_eq!(data.user, test_user());
    assert_eq!(data.session.access_token, "access-abc");
    assert!(data.session.expires_at.is_some());
    assert_eq!(client.get_session().await.unwrap(), Some(data.session));
    assert_eq!(
        *events.lock().unwrap(),
        vec![(AuthChangeEvent::SignedIn, Some(TEST_EMAIL.to_string()))]
    );
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    let result = client
        .sign_in_with_password(&Credentials::new(TEST_EMAIL, "wrong"))
        .await;

    assert_matches!(result, Err(AuthError::InvalidCredentials));
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_server_error_keeps_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
            "msg": "maintenance"
        })))
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    let result = client
        .sign_in_with_password(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await;

    assert_matches!(result, Err(AuthError::Remote { status: 503, ref message }) if message == "maintenance");
}

#[tokio::test]
async fn test_sign_out_revokes_and_clears() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", auth_header("access-abc").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    client.restore_session(test_session()).await;

    client.sign_out().await.unwrap();
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_sign_out_expired_session_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    client.restore_session(test_session()).await;

    assert!(client.sign_out().await.is_ok());
    assert_eq!(client.get_session().await.unwrap(), None);
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("apikey", TEST_API_KEY))
        .and(header("authorization", auth_header("access-abc").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_response()["user"].clone()))
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY);
    assert_eq!(client.get_user().await.unwrap(), None);

    client.restore_session(test_session()).await;
    let user = client.get_user().await.unwrap().unwrap();
    assert_eq!(user.metadata_str("role"), Some("customer"));
}

#[tokio::test]
async fn test_facade_treats_remote_failure_as_signed_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = Arc::new(RemoteAuthClient::new(server.uri(), TEST_API_KEY));
    client.restore_session(test_session()).await;
    let auth = AuthManager::new(CapabilityHandle::with_capability(client));

    assert!(auth.is_authenticated().await);
    assert_eq!(auth.get_current_user().await, None);
}

#[tokio::test]
async fn test_refresh_replaces_session_and_notifies() {
    let server = MockServer::start().await;
    let mut refreshed = token_response();
    refreshed["access_token"] = serde_json::json!("access-def");
    refreshed["refresh_token"] = serde_json::json!("refresh-uvw");
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(header("apikey", TEST_API_KEY))
        .and(body_json(serde_json::json!({ "refresh_token": "refresh-xyz" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(refreshed))
        .expect(1)
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY).with_session(Some(test_session()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    let _subscription = client.on_auth_state_change(Arc::new(
        move |event: AuthChangeEvent, session: Option<&Session>| {
            seen.lock().unwrap().push((event, session.map(|s| s.access_token.clone())));
        },
    ));

    let session = crate::assert_ok!(client.refresh_session().await);
    assert_eq!(session.access_token, "access-def");
    assert_eq!(session.refresh_token, "refresh-uvw");
    assert_eq!(client.get_session().await.unwrap(), Some(session));
    assert_eq!(
        *events.lock().unwrap(),
        vec![(AuthChangeEvent::TokenRefreshed, Some("access-def".to_string()))]
    );
}

#[tokio::test]
async fn test_rejected_refresh_token_signs_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({ "error_description": "Invalid Refresh Token" })),
        )
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY).with_session(Some(test_session()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&events);
    let _subscription = client.on_auth_state_change(Arc::new(
        move |event: AuthChangeEvent, _: Option<&Session>| seen.lock().unwrap().push(event),
    ));

    assert_matches!(client.refresh_session().await, Err(AuthError::NotAuthenticated));
    assert_eq!(client.get_session().await.unwrap(), None);
    assert_eq!(*events.lock().unwrap(), vec![AuthChangeEvent::SignedOut]);
}

#[tokio::test]
async fn test_refresh_server_error_keeps_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = RemoteAuthClient::new(server.uri(), TEST_API_KEY).with_session(Some(test_session()));

    assert_matches!(client.refresh_session().await, Err(AuthError::Remote { status: 502, .. }));
    assert_eq!(client.get_session().await.unwrap(), Some(test_session()));
}
