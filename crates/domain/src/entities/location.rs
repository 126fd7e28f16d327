//! Monitored coastal location

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{GeoLocation, LocationName};

/// A named point whose wind and marine forecast is tracked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    name: LocationName,
    coordinates: GeoLocation,
}

impl Location {
    /// Create a location from already validated parts
    #[must_use]
    pub const fn new(name: LocationName, coordinates: GeoLocation) -> Self {
        Self { name, coordinates }
    }

    /// Create a location from raw values, validating both name and coordinates
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the name is empty or the coordinates are out of range.
    pub fn parse(name: &str, latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        Ok(Self {
            name: LocationName::new(name)?,
            coordinates: GeoLocation::new(latitude, longitude)?,
        })
    }

    /// The unique location name
    #[must_use]
    pub const fn name(&self) -> &LocationName {
        &self.name
    }

    /// Where the location is
    #[must_use]
    pub const fn coordinates(&self) -> GeoLocation {
        self.coordinates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_location() {
        let loc = Location::parse("Mumbai", 18.95, 72.8258).expect("valid");
        assert_eq!(loc.name().as_str(), "Mumbai");
        assert!((loc.coordinates().latitude() - 18.95).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_rejects_bad_coordinates() {
        let err = Location::parse("Nowhere", 120.0, 0.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidCoordinates { .. }));
    }

    #[test]
    fn parse_rejects_blank_name() {
        let err = Location::parse(" ", 10.0, 10.0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidLocationName(_)));
    }
}
