//! Application layer - Use cases and orchestration
//!
//! Holds the weather cache, the refresh orchestrator and the publication layer,
//! and the ports through which they reach forecast sources and the location
//! registry.

pub mod error;
pub mod ports;
pub mod services;

pub use error::{ApplicationError, RefreshError};
pub use ports::*;
pub use services::*;
