//! Forecast source port
//!
//! Turns one location into a normalized forecast snapshot.

use async_trait::async_trait;
use domain::{ForecastSnapshot, Location};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for fetching the current wind and marine forecast of a location
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ForecastPort: Send + Sync {
    /// Fetch the first-hour forecast for `location`
    ///
    /// Readings the sources omit are returned as `None`. An error means the
    /// location has no usable data this cycle.
    async fn fetch_forecast(&self, location: &Location)
    -> Result<ForecastSnapshot, ApplicationError>;
}
