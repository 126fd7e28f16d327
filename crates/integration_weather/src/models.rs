//! Forecast payload models
//!
//! Open-Meteo answers hourly requests with parallel arrays under `hourly`.
//! Only the first time step is of interest, and any of the arrays may be
//! missing, empty, or hold `null` entries. Extraction is therefore lenient:
//! whatever cannot be read becomes `None`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

/// Hourly variable names requested from the forecast API
pub(crate) const WIND_SPEED_FIELD: &str = "windspeed_10m";
pub(crate) const WIND_DIRECTION_FIELD: &str = "winddirection_10m";

/// Hourly variable names requested from the marine API
pub(crate) const WAVE_HEIGHT_FIELD: &str = "wave_height";
pub(crate) const SEA_SURFACE_TEMPERATURE_FIELD: &str = "sea_surface_temperature";

/// Wind at 10 m for the first forecast hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindForecast {
    /// Wind speed in km/h
    pub speed: Option<f64>,
    /// Wind direction in degrees
    pub direction: Option<f64>,
}

/// Sea state for the first forecast hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineForecast {
    /// Significant wave height in metres
    pub wave_height: Option<f64>,
    /// Sea surface temperature in °C
    pub sea_surface_temperature: Option<f64>,
}

/// Decoded hourly response body
#[derive(Debug, Clone)]
pub(crate) struct HourlyPayload {
    body: Value,
}

impl HourlyPayload {
    /// Decode a response body; an undecodable body yields a payload with no fields
    pub(crate) fn from_bytes(source: &str, bytes: &[u8]) -> Self {
        let body = serde_json::from_slice(bytes).unwrap_or_else(|e| {
            warn!(source, error = %e, "Malformed forecast payload, treating all fields as missing");
            Value::Null
        });
        Self { body }
    }

    /// First element of `hourly.<field>`, if it is a number
    pub(crate) fn first(&self, field: &str) -> Option<f64> {
        let value = self
            .body
            .get("hourly")
            .and_then(|hourly| hourly.get(field))
            .and_then(Value::as_array)
            .and_then(|values| values.first())
            .and_then(Value::as_f64);
        if value.is_none() {
            debug!(field, "Hourly value missing");
        }
        value
    }

    pub(crate) fn wind(&self) -> WindForecast {
        WindForecast {
            speed: self.first(WIND_SPEED_FIELD),
            direction: self.first(WIND_DIRECTION_FIELD),
        }
    }

    pub(crate) fn marine(&self) -> MarineForecast {
        MarineForecast {
            wave_height: self.first(WAVE_HEIGHT_FIELD),
            sea_surface_temperature: self.first(SEA_SURFACE_TEMPERATURE_FIELD),
        }
    }
}
