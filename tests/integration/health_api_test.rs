//! Health API integration tests

use axum::http::StatusCode;
use trashdrop::backend::routes::create_router;
use trashdrop::backend::{AppState, Service, ServiceStatus};
use crate::common::get_json;

#[tokio::test]
async fn test_healthz_all_ok() {
    let state = AppState::new("test");
    let (status, json) = get_json(create_router(state.clone()), "/healthz").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["environment"], "test");
    assert_eq!(json["instanceId"], state.instance_id.to_string());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    for service in ["database", "cache", "auth"] {
        assert_eq!(json["services"][service], "ok");
    }
    assert!(json["memory"].is_object());
    assert!(json["os"]["platform"].is_string());
    assert!(json["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_healthz_any_error_is_503() {
    for service in Service::ALL {
        let state = AppState::new("test");
        state.set_service_status(service, ServiceStatus::Error).await;

        let (status, json) = get_json(create_router(state), "/healthz").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{:?}", service);
        assert_eq!(json["status"], "error");
    }
}

#[tokio::test]
async fn test_healthz_recovers() {
    let state = AppState::new("test");
    state.set_service_status(Service::Database, ServiceStatus::Error).await;
    state.set_service_status(Service::Database, ServiceStatus::Ok).await;

    let (status, json) = get_json(create_router(state), "/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_and_live_ignore_service_errors() {
    let state = AppState::new("test");
    state.set_service_status(Service::Auth, ServiceStatus::Error).await;

    let (status, json) = get_json(create_router(state.clone()), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
    assert!(json.get("uptime").is_none());

    let (status, json) = get_json(create_router(state), "/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["uptime"].is_number());
}
