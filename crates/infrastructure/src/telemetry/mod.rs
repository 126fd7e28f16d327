//! Logging initialization
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a
//! console `fmt` layer in text or JSON format.

mod subscriber;

pub use subscriber::{TelemetryError, init_tracing};
