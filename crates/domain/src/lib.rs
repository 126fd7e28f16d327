//! Domain layer for the coastal forecast relay
//!
//! Locations, per-location forecast snapshots and the cache-wide weather
//! snapshot. No I/O lives here.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
