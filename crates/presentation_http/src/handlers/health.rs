//! Health check handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check - is the server running?
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    /// Cycle that produced the current cache contents
    pub cycle: u64,
    /// Locations present in the cache
    pub locations: usize,
    pub last_refreshed: Option<DateTime<Utc>>,
}

/// Readiness check - has a refresh cycle produced any data yet?
///
/// Does not trigger a refresh.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let snapshot = state.refresh.cache().get();
    let ready = !snapshot.is_empty();
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(ReadinessResponse {
            ready,
            cycle: snapshot.cycle(),
            locations: snapshot.len(),
            last_refreshed: snapshot.refreshed_at(),
        }),
    )
}
