//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: the Open-Meteo forecast
//! adapter and the static location registry. Also loads configuration and
//! installs the tracing subscriber.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, ConfigError, LocationConfig, LogFormat, RefreshConfig, ServerConfig,
    UpstreamConfig,
};
pub use telemetry::{TelemetryError, init_tracing};
