/**
 * Router Configuration
 *
 * Combines the route groups into one router, wraps it in the HTTP trace
 * layer and answers unknown paths with a JSON 404.
 */

use axum::{http::StatusCode, http::Uri, Router};
use tower_http::trace::TraceLayer;
use crate::backend::error::BackendError;
use crate::backend::routes::health_routes::health_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    Router::new()
        .merge(health_routes())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn not_found(uri: Uri) -> BackendError {
    BackendError::handler(StatusCode::NOT_FOUND, format!("No route for {}", uri.path()))
}
