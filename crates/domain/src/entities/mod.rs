//! Domain entities

mod forecast_snapshot;
mod location;
mod weather_snapshot;

pub use forecast_snapshot::{ForecastSnapshot, MarineReading, WindReading};
pub use location::Location;
pub use weather_snapshot::WeatherSnapshot;
