/**
 * Server Configuration
 *
 * Reads the listening port and environment name from `SERVER_PORT` and
 * `APP_ENV` (after `.env` has been loaded by the binary). Missing values
 * fall back to port 3000 and `development`.
 */

use crate::shared::config::{AppConfig, ConfigError};

/// Load the server configuration from the environment
pub fn load_server_config() -> Result<AppConfig, ConfigError> {
    let env = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

    let mut builder = AppConfig::builder();
    if let Some(raw) = env("SERVER_PORT") {
        let port = raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
            field: "SERVER_PORT",
            message: e.to_string(),
        })?;
        builder = builder.port(port);
    }
    if let Some(environment) = env("APP_ENV") {
        builder = builder.environment(environment);
    }
    if let Some(url) = env("AUTH_URL") {
        builder = builder.auth_url(url);
    }
    builder.build()
}
