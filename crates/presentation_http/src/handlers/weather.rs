//! Weather pull and refresh handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use domain::{ForecastSnapshot, WeatherSnapshot};
use serde::{Serialize, Serializer};
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// Flat `{ name: ForecastSnapshot }` view of a cache snapshot
#[derive(Debug, Clone)]
pub struct WeatherPayload(pub Arc<WeatherSnapshot>);

impl Serialize for WeatherPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.stations().serialize(serializer)
    }
}

/// Body of a successful force-refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub data: WeatherPayload,
}

/// `GET /api/weather`
///
/// Serves the cache, refreshing once first if it holds no locations.
#[instrument(skip(state))]
pub async fn get_weather(State(state): State<AppState>) -> Json<WeatherPayload> {
    Json(WeatherPayload(state.refresh.current_or_refresh().await))
}

/// `GET /api/weather/{name}`
#[instrument(skip(state))]
pub async fn get_location_weather(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ForecastSnapshot>, ApiError> {
    let snapshot = state.refresh.current_or_refresh().await;
    snapshot
        .get(&name)
        .copied()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No weather data for location {name:?}")))
}

/// `POST /api/weather/refresh`
///
/// Runs a cycle, or joins the one already running, and returns its result.
#[instrument(skip(state))]
pub async fn refresh_weather(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let snapshot = state.refresh.refresh().await?;
    info!(
        cycle = snapshot.cycle(),
        locations = snapshot.len(),
        "Forced refresh served"
    );
    Ok(Json(RefreshResponse {
        message: "Weather data refreshed",
        data: WeatherPayload(snapshot),
    }))
}
