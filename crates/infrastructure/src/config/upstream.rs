//! Open-Meteo upstream configuration.

use integration_weather::WeatherConfig;
use serde::{Deserialize, Serialize};

/// Upstream forecast sources
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Forecast API base URL
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Marine API base URL
    #[serde(default = "default_marine_base_url")]
    pub marine_base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Forecast days requested from both sources
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,
}

fn default_forecast_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_marine_base_url() -> String {
    "https://marine-api.open-meteo.com/v1".to_string()
}

const fn default_timeout() -> u64 {
    5
}

const fn default_forecast_days() -> u8 {
    1
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            marine_base_url: default_marine_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

impl From<&UpstreamConfig> for WeatherConfig {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            forecast_base_url: config.forecast_base_url.clone(),
            marine_base_url: config.marine_base_url.clone(),
            timeout_secs: config.timeout_secs,
            forecast_days: config.forecast_days,
        }
    }
}
