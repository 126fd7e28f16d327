//! Application-level errors

use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// An upstream forecast source could not be reached or answered with an error status
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The configured location list could not be read
    #[error("Locations unavailable: {0}")]
    LocationsUnavailable(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a whole refresh cycle
///
/// Cloneable because every caller that joined the same in-flight cycle
/// receives the same outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// The location registry could not be read; nothing was fetched
    #[error("Location registry unavailable: {0}")]
    LocationsUnavailable(String),

    /// The cycle task stopped before it could publish a result
    #[error("Refresh cycle aborted: {0}")]
    Aborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_error_messages() {
        let err = ApplicationError::UpstreamUnavailable("marine forecast for Goa: HTTP 503".into());
        assert_eq!(err.to_string(), "Upstream unavailable: marine forecast for Goa: HTTP 503");

        let err = ApplicationError::Internal("bad coordinates".into());
        assert!(err.to_string().starts_with("Internal error"));
    }

    #[test]
    fn refresh_error_messages() {
        let err = RefreshError::LocationsUnavailable("file missing".into());
        assert_eq!(err.to_string(), "Location registry unavailable: file missing");

        let err = RefreshError::Aborted("task panicked".into());
        assert!(err.to_string().contains("aborted"));
    }
}
