//! Client Session Module
//!
//! Everything the TrashDrop pages need for the auth/session lifecycle,
//! expressed without a browser: the auth capability and its handle, the
//! hosted and mock implementations, the session facade, the logout
//! controller, the environment compatibility rules and the token
//! diagnostics tool.
//!
//! # Architecture
//!
//! - **`capability`** - `AuthCapability` trait, set-once `CapabilityHandle`, listeners
//! - **`remote_auth`** - HTTP client for the hosted auth service
//! - **`mock_auth`** - in-memory provider with a fixed account roster
//! - **`auth_manager`** - `AuthManager` session facade
//! - **`logout`** - `LogoutController` (normal and emergency logout)
//! - **`compat`** - Safari / loopback / tunnel compatibility rules
//! - **`diagnostics`** - stored token inspection and profile check
//! - **`page`** - `Page` trait plus the recording `HeadlessPage`
//! - **`config`** - client configuration (env + TOML)
//! - **`main`** - `trashdrop-diag` command-line entry point (binary)
//!
//! # Startup order
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use trashdrop::client::{compat, AuthManager, Config, HeadlessPage, PageEnvironment};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let page = Arc::new(HeadlessPage::new());
//! let env = PageEnvironment::from_url("Mozilla/5.0", "https://localhost:3000/dashboard")?;
//!
//! // Compatibility redirects run before anything else
//! if compat::evaluate(&env).apply(page.as_ref()) {
//!     return Ok(());
//! }
//!
//! let config = Config::from_env()?;
//! let auth = AuthManager::new(config.capability_handle()).with_timeout(config.capability_timeout());
//! auth.initialize().await?;
//! let signed_in = auth.is_authenticated().await;
//! # let _ = signed_in;
//! # Ok(())
//! # }
//! ```

pub mod auth_manager;
pub mod capability;
pub mod compat;
pub mod config;
pub mod diagnostics;
pub mod logout;
pub mod mock_auth;
pub mod page;
pub mod remote_auth;

// Re-export commonly used types
pub use auth_manager::AuthManager;
pub use capability::{AuthCapability, AuthStateCallback, CapabilityHandle, Subscription};
pub use compat::{evaluate, CompatDecision, PageEnvironment, RenderFilter};
pub use config::Config;
pub use diagnostics::{DiagnosticReport, TokenDiagnostics};
pub use logout::{LogoutButton, LogoutController, LogoutOutcome};
pub use mock_auth::MockAuthProvider;
pub use page::{HeadlessPage, Page};
pub use remote_auth::RemoteAuthClient;
