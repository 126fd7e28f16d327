//! Open-Meteo forecast integration
//!
//! Client for the Open-Meteo forecast API (<https://open-meteo.com>) and its
//! marine counterpart. Both are keyless and queried by coordinates; only the
//! first hourly time step is read.

pub mod client;
mod models;

pub use client::{ForecastClient, OpenMeteoClient, WeatherConfig, WeatherError};
pub use models::{MarineForecast, WindForecast};
