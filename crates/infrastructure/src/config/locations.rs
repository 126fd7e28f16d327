//! Monitored location list.

use domain::{DomainError, Location};
use serde::{Deserialize, Serialize};

/// One configured location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Unique display name
    pub name: String,
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl LocationConfig {
    /// Shorthand constructor
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Convert to the domain `Location`
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the name is blank or the coordinates are out of range.
    pub fn to_location(&self) -> Result<Location, DomainError> {
        Location::parse(&self.name, self.latitude, self.longitude)
    }
}

/// The coastal locations monitored out of the box
pub fn default_locations() -> Vec<LocationConfig> {
    vec![
        LocationConfig::new("Mumbai", 18.95, 72.8258),
        LocationConfig::new("Chennai", 13.0827, 80.2707),
        LocationConfig::new("Goa", 15.4909, 73.8278),
        LocationConfig::new("Digha (near Kolkata)", 21.6270, 87.5480),
    ]
}
