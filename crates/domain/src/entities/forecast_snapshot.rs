//! Per-location forecast snapshot
//!
//! Every reading is optional: `None` means the upstream source did not report
//! the value for the first forecast hour. It serializes as `null` so consumers
//! can tell a missing reading from a real zero.

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoLocation;

/// Wind conditions at the first forecast hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindReading {
    /// Wind speed at 10 m in km/h
    pub speed: Option<f64>,
    /// Wind direction at 10 m in degrees
    pub direction: Option<f64>,
}

/// Sea state at the first forecast hour
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarineReading {
    /// Significant wave height in metres
    pub wave_height: Option<f64>,
    /// Sea surface temperature in °C
    pub sea_surface_temperature: Option<f64>,
}

/// Normalized weather record for one location in one refresh cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    /// Coordinates the forecast was requested for
    pub coordinates: GeoLocation,
    /// Wind forecast
    pub wind: WindReading,
    /// Marine forecast
    pub marine: MarineReading,
}

impl ForecastSnapshot {
    /// Assemble a snapshot from its parts
    #[must_use]
    pub const fn new(coordinates: GeoLocation, wind: WindReading, marine: MarineReading) -> Self {
        Self {
            coordinates,
            wind,
            marine,
        }
    }

    /// Number of readings the upstream sources did not provide
    #[must_use]
    pub fn missing_readings(&self) -> usize {
        [
            self.wind.speed,
            self.wind.direction,
            self.marine.wave_height,
            self.marine.sea_surface_temperature,
        ]
        .iter()
        .filter(|r| r.is_none())
        .count()
    }
}
