//! Route definitions

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health and status endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        // Weather pull API
        .route("/api/weather", get(handlers::weather::get_weather))
        // Static segment wins over `{name}`: GET here is 405, so no location can be named "refresh"
        .route("/api/weather/refresh", post(handlers::weather::refresh_weather))
        .route("/api/weather/{name}", get(handlers::weather::get_location_weather))
        // Push channel
        .route("/ws", get(handlers::push::push_channel))
        // Attach state
        .with_state(state)
}
