//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    /// Coordinates outside the valid range
    #[error(
        "Invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude must be -180 to 180"
    )]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Location name rejected
    #[error("Invalid location name: {0}")]
    InvalidLocationName(String),

    /// Two locations share a name
    #[error("Duplicate location: {0}")]
    DuplicateLocation(String),
}
