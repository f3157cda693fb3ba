//! Backend Module
//!
//! Axum HTTP server exposing the TrashDrop health probes. Only compiled with
//! the `server` feature.
//!
//! # Architecture
//!
//! - **`server`** - initialization, configuration, application state
//! - **`routes`** - router assembly and probe handlers
//! - **`health`** - health report types and collectors
//! - **`error`** - backend error type and its HTTP conversion
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - trashdrop-server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── health/         - Health report
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! `AppState` is cloned into each handler; the tracked service statuses
//! sit behind `Arc<tokio::sync::RwLock<_>>` so they can be updated while
//! the server is running.
//!
//! # Example
//!
//! ```rust,no_run
//! use trashdrop::backend::server::{create_app, load_server_config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_server_config()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Health report types
pub mod health;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use health::{HealthReport, Service, ServiceStatus};
pub use server::{create_app, AppState};
