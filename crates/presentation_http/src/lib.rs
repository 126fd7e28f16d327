//! Coastal relay HTTP presentation layer
//!
//! Pull API, WebSocket push channel and the periodic refresh task.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
pub use tasks::{RefreshScheduler, spawn_refresh_scheduler};
