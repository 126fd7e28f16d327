//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod forecast_adapter;
mod location_registry_adapter;

pub use forecast_adapter::OpenMeteoForecastAdapter;
pub use location_registry_adapter::StaticLocationRegistry;
