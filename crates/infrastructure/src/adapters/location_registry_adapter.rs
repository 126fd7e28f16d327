//! Static location registry - Implements LocationRegistryPort from configuration

use std::collections::HashSet;

use application::error::ApplicationError;
use application::ports::LocationRegistryPort;
use async_trait::async_trait;
use domain::{DomainError, Location};

/// Immutable location list loaded at startup
#[derive(Debug, Clone, Default)]
pub struct StaticLocationRegistry {
    locations: Vec<Location>,
}

impl StaticLocationRegistry {
    /// Create a registry, rejecting duplicate names
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateLocation` if two locations share a name.
    pub fn new(locations: Vec<Location>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for location in &locations {
            if !seen.insert(location.name().as_str()) {
                return Err(DomainError::DuplicateLocation(
                    location.name().as_str().to_string(),
                ));
            }
        }
        Ok(Self { locations })
    }

    /// Number of registered locations
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether no locations are registered
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[async_trait]
impl LocationRegistryPort for StaticLocationRegistry {
    async fn locations(&self) -> Result<Vec<Location>, ApplicationError> {
        Ok(self.locations.clone())
    }
}
