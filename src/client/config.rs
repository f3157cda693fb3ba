use crate::client::capability::{AuthCapability, CapabilityHandle};
use crate::client::remote_auth::RemoteAuthClient;
use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};
use crate::shared::session::Session;
use crate::shared::storage::{load_session_artifacts, FileStorage, KeyValueStore};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Optional TOML file layer; environment variables win over it
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    server_url: Option<String>,
    auth_url: Option<String>,
    auth_api_key: Option<String>,
    capability_timeout_ms: Option<u64>,
    storage_path: Option<PathBuf>,
}

/// Client configuration wrapper.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    storage_path: Option<PathBuf>,
}

impl Config {
    /// Configuration from `CLIENT_API_URL`, `AUTH_URL`, `AUTH_API_KEY`,
    /// `CAPABILITY_TIMEOUT_MS` and `LOCAL_STORAGE_PATH`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::layered(FileConfig::default())
    }

    /// Read `path` as TOML, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let file: FileConfig = toml::from_str(&raw)?;
        Self::layered(file)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self {
            app: builder.build()?,
            storage_path: None,
        })
    }

    fn layered(file: FileConfig) -> Result<Self, ConfigError> {
        let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut builder = AppConfig::builder();
        if let Some(url) = env("CLIENT_API_URL").or(file.server_url) {
            builder = builder.server_url(url);
        }
        if let Some(url) = env("AUTH_URL").or(file.auth_url) {
            builder = builder.auth_url(url);
        }
        if let Some(key) = env("AUTH_API_KEY").or(file.auth_api_key) {
            builder = builder.auth_api_key(key);
        }
        let timeout_ms = match env("CAPABILITY_TIMEOUT_MS") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "CAPABILITY_TIMEOUT_MS",
                message: e.to_string(),
            })?),
            None => file.capability_timeout_ms,
        };
        if let Some(ms) = timeout_ms {
            builder = builder.capability_timeout(Duration::from_millis(ms));
        }

        let storage_path = env("LOCAL_STORAGE_PATH").map(PathBuf::from).or(file.storage_path);
        Ok(Self {
            app: builder.build()?,
            storage_path,
        })
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn server_url(&self) -> &str {
        &self.app.server_url
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    pub fn capability_timeout(&self) -> Duration {
        self.app.capability_timeout
    }

    /// Where the file-backed local storage lives
    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path.clone().or_else(FileStorage::default_path)
    }

    /// The hosted auth client, when an auth URL is configured
    pub fn remote_capability(&self) -> Option<Arc<dyn AuthCapability>> {
        self.remote_client(None)
            .map(|client| Arc::new(client) as Arc<dyn AuthCapability>)
    }

    /// The concrete hosted auth client, starting out with `session`
    pub fn remote_client(&self, session: Option<Session>) -> Option<RemoteAuthClient> {
        let url = self.app.auth_url.as_ref()?;
        let key = self.app.auth_api_key.clone().unwrap_or_default();
        Some(RemoteAuthClient::new(url.clone(), key).with_session(session))
    }

    /// Handle holding the remote client, or the mock when none is configured
    pub fn capability_handle(&self) -> CapabilityHandle {
        self.handle_with(self.remote_capability())
    }

    /// Like [`Config::capability_handle`], but the remote client resumes the
    /// session a previous sign-in stored in `local_storage`
    pub fn capability_handle_for(&self, local_storage: &dyn KeyValueStore) -> CapabilityHandle {
        let session = load_session_artifacts(local_storage);
        if session.is_none() {
            tracing::debug!("No stored session to resume");
        }
        let remote = self
            .remote_client(session)
            .map(|client| Arc::new(client) as Arc<dyn AuthCapability>);
        self.handle_with(remote)
    }

    fn handle_with(&self, remote: Option<Arc<dyn AuthCapability>>) -> CapabilityHandle {
        let handle = CapabilityHandle::new();
        if let Some(remote) = remote {
            // Fresh handle: install cannot collide
            let _ = handle.install(remote);
        }
        handle.install_mock_if_absent();
        handle
    }
}
