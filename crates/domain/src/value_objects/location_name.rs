//! Location name - the key under which a location's forecast is published

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Maximum accepted length for a location name
const MAX_NAME_LEN: usize = 128;

/// Unique, human-readable identifier of a monitored location
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocationName(String);

impl LocationName {
    /// Create a location name, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidLocationName` if the trimmed name is empty
    /// or longer than 128 characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidLocationName(
                "name must not be empty".to_string(),
            ));
        }
        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::InvalidLocationName(format!(
                "name exceeds {MAX_NAME_LEN} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LocationName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LocationName> for String {
    fn from(name: LocationName) -> Self {
        name.0
    }
}

impl AsRef<str> for LocationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for LocationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_whitespace() {
        let name = LocationName::new("  Goa ").expect("valid");
        assert_eq!(name.as_str(), "Goa");
    }

    #[test]
    fn rejects_empty() {
        assert!(LocationName::new("").is_err());
        assert!(LocationName::new("   ").is_err());
    }

    #[test]
    fn rejects_overlong() {
        let long = "x".repeat(129);
        assert!(LocationName::new(long).is_err());
        assert!(LocationName::new("x".repeat(128)).is_ok());
    }

    #[test]
    fn keeps_punctuation() {
        let name = LocationName::new("Digha (near Kolkata)").expect("valid");
        assert_eq!(name.to_string(), "Digha (near Kolkata)");
    }

    #[test]
    fn deserialization_validates() {
        let ok: Result<LocationName, _> = serde_json::from_str("\"Chennai\"");
        assert!(ok.is_ok());
        let bad: Result<LocationName, _> = serde_json::from_str("\"  \"");
        assert!(bad.is_err());
    }
}
