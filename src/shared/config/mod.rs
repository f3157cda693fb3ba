//! Application configuration module
//!
//! Provides configuration types shared by the client tools and the server.

use std::time::Duration;
use thiserror::Error;

/// Default API server URL
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Default wait for the auth capability to appear
pub const DEFAULT_CAPABILITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Default deployment environment name
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Default listening port
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// API server URL (profile endpoint, health)
    pub server_url: String,
    /// Hosted auth service URL; `None` means the mock provider is used
    pub auth_url: Option<String>,
    /// Public API key sent to the auth service
    pub auth_api_key: Option<String>,
    /// Upper bound on waiting for the auth capability
    pub capability_timeout: Duration,
    /// Deployment environment name reported by the health endpoint
    pub environment: String,
    /// Listening port
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            auth_url: None,
            auth_api_key: None,
            capability_timeout: DEFAULT_CAPABILITY_TIMEOUT,
            environment: DEFAULT_ENVIRONMENT.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_url(&self.server_url)?;
        if let Some(auth_url) = &self.auth_url {
            validate_url(auth_url)?;
        }
        if self.environment.trim().is_empty() {
            return Err(ConfigError::MissingValue("environment"));
        }
        if self.capability_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "capability_timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url).map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(ConfigError::InvalidUrl(url.to_string())),
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_url: Option<String>,
    auth_url: Option<String>,
    auth_api_key: Option<String>,
    capability_timeout: Option<Duration>,
    environment: Option<String>,
    port: Option<u16>,
}

impl AppConfigBuilder {
    /// Set the server URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the hosted auth service URL
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = Some(url.into());
        self
    }

    /// Set the auth service API key
    pub fn auth_api_key(mut self, key: impl Into<String>) -> Self {
        self.auth_api_key = Some(key.into());
        self
    }

    /// Set the capability wait timeout
    pub fn capability_timeout(mut self, timeout: Duration) -> Self {
        self.capability_timeout = Some(timeout);
        self
    }

    /// Set the environment name
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the listening port
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            server_url: self
                .server_url
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.server_url),
            auth_url: self.auth_url.map(|url| url.trim_end_matches('/').to_string()),
            auth_api_key: self.auth_api_key,
            capability_timeout: self.capability_timeout.unwrap_or(defaults.capability_timeout),
            environment: self.environment.unwrap_or(defaults.environment),
            port: self.port.unwrap_or(defaults.port),
        };
        config.validate()?;
        Ok(config)
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
