//! Open-Meteo forecast client
//!
//! HTTP client for the Open-Meteo wind forecast and marine forecast APIs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{
    HourlyPayload, MarineForecast, SEA_SURFACE_TEMPERATURE_FIELD, WAVE_HEIGHT_FIELD,
    WIND_DIRECTION_FIELD, WIND_SPEED_FIELD, WindForecast,
};

/// Forecast client errors
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The HTTP client could not be built
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Request could not be sent or the server answered with a client error
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// No answer within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid coordinates provided
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Service answered with a server error
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Forecast client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Forecast API base URL (default: <https://api.open-meteo.com/v1>)
    #[serde(default = "default_forecast_base_url")]
    pub forecast_base_url: String,

    /// Marine API base URL (default: <https://marine-api.open-meteo.com/v1>)
    #[serde(default = "default_marine_base_url")]
    pub marine_base_url: String,

    /// Per-request timeout in seconds (default: 5)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Number of forecast days requested (1-16, default: 1)
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

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_base_url: default_forecast_base_url(),
            marine_base_url: default_marine_base_url(),
            timeout_secs: default_timeout(),
            forecast_days: default_forecast_days(),
        }
    }
}

/// Client trait for the two forecast sources
#[async_trait]
pub trait ForecastClient: Send + Sync {
    /// Wind speed and direction for the first forecast hour
    async fn get_wind(&self, latitude: f64, longitude: f64) -> Result<WindForecast, WeatherError>;

    /// Wave height and sea surface temperature for the first forecast hour
    async fn get_marine(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MarineForecast, WeatherError>;
}

/// Open-Meteo HTTP client implementation
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The configuration the client was built with
    #[must_use]
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Validate coordinates
    fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), WeatherError> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(WeatherError::InvalidCoordinates);
        }
        Ok(())
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.config.forecast_base_url.trim_end_matches('/'))
    }

    fn marine_url(&self) -> String {
        format!("{}/marine", self.config.marine_base_url.trim_end_matches('/'))
    }

    fn map_send_error(&self, e: &reqwest::Error) -> WeatherError {
        if e.is_timeout() {
            WeatherError::Timeout(Duration::from_secs(self.config.timeout_secs))
        } else {
            WeatherError::RequestFailed(e.to_string())
        }
    }

    /// Issue an hourly query and decode whatever body comes back
    async fn fetch_hourly(
        &self,
        source: &'static str,
        url: &str,
        latitude: f64,
        longitude: f64,
        fields: [&str; 2],
    ) -> Result<HourlyPayload, WeatherError> {
        Self::validate_coordinates(latitude, longitude)?;

        let days = self.config.forecast_days.clamp(1, 16);
        debug!(url = %url, source, "Fetching hourly forecast");

        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("hourly", fields.join(",")),
                ("forecast_days", days.to_string()),
            ])
            .send()
            .await
            .map_err(|e| self.map_send_error(&e))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(WeatherError::RateLimitExceeded);
        }
        if status.is_server_error() {
            return Err(WeatherError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(WeatherError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response.bytes().await.map_err(|e| self.map_send_error(&e))?;
        Ok(HourlyPayload::from_bytes(source, &body))
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_wind(&self, latitude: f64, longitude: f64) -> Result<WindForecast, WeatherError> {
        let url = self.forecast_url();
        let payload = self
            .fetch_hourly(
                "wind",
                &url,
                latitude,
                longitude,
                [WIND_SPEED_FIELD, WIND_DIRECTION_FIELD],
            )
            .await?;
        Ok(payload.wind())
    }

    #[instrument(skip(self), fields(lat = %latitude, lon = %longitude))]
    async fn get_marine(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<MarineForecast, WeatherError> {
        let url = self.marine_url();
        let payload = self
            .fetch_hourly(
                "marine",
                &url,
                latitude,
                longitude,
                [WAVE_HEIGHT_FIELD, SEA_SURFACE_TEMPERATURE_FIELD],
            )
            .await?;
        Ok(payload.marine())
    }
}
