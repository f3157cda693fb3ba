/**
 * Application State Management
 *
 * `AppState` is cloned into every handler. It carries the instance
 * identity used in health reports and the tracked service statuses.
 *
 * ```rust
 * use axum::extract::State;
 * use trashdrop::backend::server::state::AppState;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let services = state.services().await;
 *     // ...
 * }
 * ```
 */

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::backend::health::{HealthReport, Service, ServiceStatus, ServiceStatuses};

/// Shared state for the health server
#[derive(Debug, Clone)]
pub struct AppState {
    /// Process start, for uptime
    pub started_at: Instant,
    /// Random id identifying this server instance
    pub instance_id: Uuid,
    /// Deployment environment name (`APP_ENV`)
    pub environment: String,
    /// Tracked service statuses
    pub services: Arc<RwLock<ServiceStatuses>>,
}

impl AppState {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            started_at: Instant::now(),
            instance_id: Uuid::new_v4(),
            environment: environment.into(),
            services: Arc::new(RwLock::new(ServiceStatuses::default())),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub async fn services(&self) -> ServiceStatuses {
        *self.services.read().await
    }

    /// Record a new status for one tracked service
    pub async fn set_service_status(&self, service: Service, status: ServiceStatus) {
        let mut services = self.services.write().await;
        let previous = services.get(service);
        services.set(service, status);
        if previous != status {
            tracing::info!("Service {:?} status changed: {:?} -> {:?}", service, previous, status);
        }
    }

    /// Snapshot the current health of this instance
    pub async fn health_report(&self) -> HealthReport {
        HealthReport::new(
            self.services().await,
            self.instance_id,
            self.environment.clone(),
            self.uptime(),
        )
    }
}
