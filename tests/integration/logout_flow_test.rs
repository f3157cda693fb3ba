//! Logout flows against real storage
//!
//! After either logout path no auth artifact may remain in local storage
//! and session storage must be empty.

use std::sync::Arc;
use trashdrop::client::logout::{EMERGENCY_LOGOUT_URL, LOGOUT_SUCCESS_URL};
use trashdrop::client::{
    AuthCapability, AuthManager, Config, HeadlessPage, LogoutButton, LogoutController, LogoutOutcome,
};
use trashdrop::shared::storage::{store_session_artifacts, FileStorage, KeyValueStore, MemoryStorage};
use trashdrop::shared::{AppConfig, Credentials};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use crate::common::{
    auth_header, mock_auth_manager, signed_in_local_storage, test_session, TEST_API_KEY, TEST_EMAIL,
    TEST_PASSWORD,
};

fn session_storage() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_entries([("pickup_draft", "{}"), ("scroll", "120")]))
}

#[tokio::test]
async fn test_normal_logout_clears_everything() {
    let (auth, mock) = mock_auth_manager();
    mock.sign_in_with_password(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    let local = signed_in_local_storage();
    let session = session_storage();
    let page = Arc::new(HeadlessPage::new());
    let controller = LogoutController::new(auth, local.clone(), session.clone(), page.clone());
    controller.bind([
        LogoutButton::new("nav-logout", "Log out"),
        LogoutButton::new("menu-logout", "Sign out").with_confirmation("Are you sure?"),
    ]);

    let outcome = controller.click("nav-logout").await;

    assert!(matches!(outcome, LogoutOutcome::LoggedOut { redirect } if redirect == LOGOUT_SUCCESS_URL));
    crate::assert_logged_out!(local.as_ref());
    assert_eq!(local.get("theme").as_deref(), Some("dark"));
    assert!(session.is_empty());
    assert_eq!(mock.get_session().await.unwrap(), None);
    assert_eq!(page.navigations(), vec![LOGOUT_SUCCESS_URL.to_string()]);
    assert!(page.confirmations().is_empty());
}

#[tokio::test]
async fn test_emergency_logout_clears_everything() {
    let (auth, mock) = mock_auth_manager();
    mock.sign_in_with_password(&Credentials::new(TEST_EMAIL, TEST_PASSWORD))
        .await
        .unwrap();

    let local = signed_in_local_storage();
    let session = session_storage();
    let page = Arc::new(HeadlessPage::new());
    page.set_cookie("sb-access-token", "abc");
    page.open_dialog();
    let controller = LogoutController::new(auth, local.clone(), session.clone(), page.clone());

    controller.emergency_logout().unwrap();

    crate::assert_logged_out!(local.as_ref());
    assert!(session.is_empty());
    assert!(page.cookies().is_empty());
    assert_eq!(page.open_dialogs(), 0);
    assert_eq!(page.last_navigation().as_deref(), Some(EMERGENCY_LOGOUT_URL));
    // The auth service is never contacted
    assert!(mock.get_session().await.unwrap().is_some());
}

#[tokio::test]
async fn test_logout_persists_to_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    {
        let seeded = FileStorage::open(&path);
        for key in trashdrop::shared::AUTH_ARTIFACT_KEYS {
            seeded.set(key, "x").unwrap();
        }
    }

    let (auth, _mock) = mock_auth_manager();
    let local = Arc::new(FileStorage::open(&path));
    let controller = LogoutController::new(
        auth,
        local,
        session_storage(),
        Arc::new(HeadlessPage::new()),
    );
    controller.bind([LogoutButton::new("logout", "Log out")]);
    assert!(matches!(controller.click("logout").await, LogoutOutcome::LoggedOut { .. }));

    let reopened = FileStorage::open(&path);
    crate::assert_logged_out!(&reopened);
}

#[tokio::test]
async fn test_logout_revokes_stored_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("apikey", TEST_API_KEY))
        .and(header("authorization", auth_header("access-abc").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    // Artifacts left on disk by an earlier sign-in, read back by a new process
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("local_storage.json");
    store_session_artifacts(&FileStorage::open(&path), &test_session(), false).unwrap();
    let local = Arc::new(FileStorage::open(&path));

    let config = Config::with_builder(
        AppConfig::builder().auth_url(server.uri()).auth_api_key(TEST_API_KEY),
    )
    .unwrap();
    let auth = AuthManager::new(config.capability_handle_for(local.as_ref()));
    assert!(auth.is_authenticated().await);

    let controller = LogoutController::new(auth, local, session_storage(), Arc::new(HeadlessPage::new()));
    controller.bind([LogoutButton::new("logout", "Log out")]);
    assert!(matches!(controller.click("logout").await, LogoutOutcome::LoggedOut { .. }));

    let reopened = FileStorage::open(&path);
    crate::assert_logged_out!(&reopened);
    server.verify().await;
}

#[tokio::test]
async fn test_resume_without_artifacts_skips_revocation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = Config::with_builder(AppConfig::builder().auth_url(server.uri())).unwrap();
    let local = Arc::new(MemoryStorage::with_entries([("theme", "dark")]));
    let auth = AuthManager::new(config.capability_handle_for(local.as_ref()));
    assert!(!auth.is_authenticated().await);

    let controller = LogoutController::new(auth, local.clone(), session_storage(), Arc::new(HeadlessPage::new()));
    controller.bind([LogoutButton::new("logout", "Log out")]);
    assert!(matches!(controller.click("logout").await, LogoutOutcome::LoggedOut { .. }));
    assert_eq!(local.get("theme").as_deref(), Some("dark"));
}
