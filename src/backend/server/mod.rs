//! Server Module
//!
//! Server initialization, configuration and shared application state.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState (instance identity, service statuses)
//! ├── config.rs       - SERVER_PORT / APP_ENV loading
//! └── init.rs         - App creation
//! ```

/// Application state
pub mod state;

/// Configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::load_server_config;
pub use init::create_app;
pub use state::AppState;
