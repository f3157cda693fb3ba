/**
 * Server Initialization
 *
 * Builds the application state and router for a given configuration.
 */

use axum::Router;
use crate::backend::health::{Service, ServiceStatus};
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::shared::config::AppConfig;

/// Create and configure the Axum application
///
/// The auth service is reported as `warning` when no hosted auth URL is
/// configured, since clients will fall back to the mock provider.
pub async fn create_app(config: &AppConfig) -> Router<()> {
    tracing::info!("Initializing TrashDrop health server ({})", config.environment);

    let app_state = AppState::new(config.environment.clone());
    if config.auth_url.is_none() {
        tracing::warn!("AUTH_URL not set; reporting auth service as degraded");
        app_state
            .set_service_status(Service::Auth, ServiceStatus::Warning)
            .await;
    }

    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
