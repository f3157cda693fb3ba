//! Health check endpoints.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use crate::backend::health::{HealthReport, ProbeResponse};
use crate::backend::server::state::AppState;

/// Full health report; 503 when any tracked service is in error
pub async fn healthz(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health_report().await;
    let status = report.http_status();
    if status != StatusCode::OK {
        tracing::warn!("Health check failing: {:?}", report.services);
    }
    (status, Json(report))
}

pub async fn ready() -> Json<ProbeResponse> {
    Json(ProbeResponse::ok())
}

pub async fn live(State(state): State<AppState>) -> Json<ProbeResponse> {
    Json(ProbeResponse::ok().with_uptime(state.uptime()))
}

/// Create health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/ready", get(ready))
        .route("/live", get(live))
}
