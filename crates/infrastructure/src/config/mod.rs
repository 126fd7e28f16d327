//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server, origins and logging
//! - `refresh`: refresh schedule
//! - `upstream`: Open-Meteo endpoints and timeouts
//! - `locations`: the monitored location list

mod locations;
mod refresh;
mod server;
mod upstream;

use std::collections::HashSet;

use domain::Location;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use locations::{LocationConfig, default_locations};
pub use refresh::RefreshConfig;
pub use server::{LogFormat, ServerConfig};
pub use upstream::UpstreamConfig;

/// Environment variable naming an alternative config file
pub const CONFIG_FILE_ENV: &str = "COASTAL_CONFIG";

/// Prefix for environment variable overrides (e.g. `COASTAL_SERVER__PORT`)
pub const ENV_PREFIX: &str = "COASTAL";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// Values were read but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Refresh schedule
    #[serde(default)]
    pub refresh: RefreshConfig,

    /// Upstream forecast sources
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Monitored locations
    #[serde(default = "default_locations")]
    pub locations: Vec<LocationConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            refresh: RefreshConfig::default(),
            upstream: UpstreamConfig::default(),
            locations: default_locations(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// Sources, lowest priority first: built-in defaults, `config.toml` (or the
    /// file named by `COASTAL_CONFIG`), then `COASTAL_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let file = std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| "config".to_string());
        Self::load_from(&file)
    }

    /// Load configuration using the given file name (extension optional)
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        debug!(file, "Loading configuration");

        let builder = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that deserialize fine but cannot be used
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "refresh.interval_secs must be greater than zero".into(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "upstream.timeout_secs must be greater than zero".into(),
            ));
        }
        self.to_locations().map(|_| ())
    }

    /// Validated domain locations, in configured order
    pub fn to_locations(&self) -> Result<Vec<Location>, ConfigError> {
        let mut seen = HashSet::new();
        self.locations
            .iter()
            .map(|entry| {
                let location = entry
                    .to_location()
                    .map_err(|e| ConfigError::Invalid(format!("location {:?}: {e}", entry.name)))?;
                if !seen.insert(location.name().as_str().to_string()) {
                    return Err(ConfigError::Invalid(format!(
                        "duplicate location name {:?}",
                        location.name().as_str()
                    )));
                }
                Ok(location)
            })
            .collect()
    }
}
