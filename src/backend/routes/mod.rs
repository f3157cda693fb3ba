//! Route Configuration Module
//!
//! - **`router`** - main router creation, tracing layer and fallback
//! - **`health_routes`** - `/healthz`, `/ready` and `/live`
//!
//! # Routes
//!
//! - `GET /healthz` - full health report (503 when a service is in error)
//! - `GET /ready` - readiness probe, always 200
//! - `GET /live` - liveness probe with uptime, always 200

/// Main router creation
pub mod router;

/// Health probe handlers
pub mod health_routes;

// Re-export commonly used functions
pub use router::create_router;
