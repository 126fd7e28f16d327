//! Integration tests for HTTP handlers
#![allow(clippy::expect_used)]

use std::{
    collections::HashSet,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use application::{
    ApplicationError, Publisher, RefreshService, WeatherCache,
    ports::{ForecastPort, LocationRegistryPort},
};
use async_trait::async_trait;
use axum::http::{HeaderValue, StatusCode, header::ORIGIN};
use axum_test::{TestServer, WsMessage};
use domain::{ForecastSnapshot, Location, MarineReading, WindReading};
use infrastructure::AppConfig;
use presentation_http::{routes::create_router, state::AppState};
use serde_json::{Value, json};

/// Registry serving a fixed list, or failing on demand
struct MockRegistry {
    locations: Vec<Location>,
    fail: bool,
}

impl MockRegistry {
    fn new(names: &[(&str, f64, f64)]) -> Self {
        Self {
            locations: names
                .iter()
                .map(|(name, lat, lon)| Location::parse(name, *lat, *lon).expect("valid location"))
                .collect(),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            locations: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl LocationRegistryPort for MockRegistry {
    async fn locations(&self) -> Result<Vec<Location>, ApplicationError> {
        if self.fail {
            return Err(ApplicationError::LocationsUnavailable(
                "registry offline".into(),
            ));
        }
        Ok(self.locations.clone())
    }
}

/// Forecast source with per-location failures, an optional delay and a call counter
struct MockForecasts {
    calls: AtomicUsize,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

impl MockForecasts {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failing: HashSet::new(),
            delay: None,
        }
    }

    fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ForecastPort for MockForecasts {
    async fn fetch_forecast(&self, location: &Location) -> Result<ForecastSnapshot, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(location.name().as_str()) {
            return Err(ApplicationError::UpstreamUnavailable(format!(
                "marine forecast for {}: HTTP 503",
                location.name()
            )));
        }
        Ok(ForecastSnapshot::new(
            location.coordinates(),
            WindReading {
                speed: Some(10.0),
                direction: None,
            },
            MarineReading {
                wave_height: Some(1.2),
                sea_surface_temperature: Some(28.4),
            },
        ))
    }
}

const COAST: &[(&str, f64, f64)] = &[("A", 18.95, 72.8258), ("B", 13.0827, 80.2707)];

fn create_state(registry: MockRegistry, forecasts: Arc<MockForecasts>) -> AppState {
    let cache = WeatherCache::new();
    let publisher = Arc::new(Publisher::new(cache.clone()));
    let refresh = Arc::new(RefreshService::new(
        Arc::new(registry),
        forecasts,
        cache,
        publisher,
    ));
    AppState::new(refresh, Arc::new(AppConfig::default()))
}

fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

fn create_ws_test_server(state: AppState) -> TestServer {
    TestServer::builder()
        .http_transport()
        .build(create_router(state))
        .expect("Failed to create test server")
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = create_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::new(MockForecasts::new()),
    ));

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn ready_reflects_cache_population() {
    let state = create_state(MockRegistry::new(COAST), Arc::new(MockForecasts::new()));
    let server = create_test_server(state);

    let response = server.get("/ready").await;
    response.assert_status_service_unavailable();
    let body: Value = response.json();
    assert_eq!(body["ready"], false);
    assert_eq!(body["cycle"], 0);

    server.post("/api/weather/refresh").await.assert_status_ok();

    let response = server.get("/ready").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["ready"], true);
    assert_eq!(body["cycle"], 1);
    assert_eq!(body["locations"], 2);
    assert!(body["last_refreshed"].is_string());
}

// ============================================================================
// Pull API
// ============================================================================

#[tokio::test]
async fn first_pull_refreshes_once_and_second_pull_reuses_it() {
    let forecasts = Arc::new(MockForecasts::new());
    let server = create_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::clone(&forecasts),
    ));

    let first = server.get("/api/weather").await;
    first.assert_status_ok();
    assert_eq!(forecasts.calls(), 2);

    let second = server.get("/api/weather").await;
    second.assert_status_ok();
    assert_eq!(forecasts.calls(), 2);

    assert_eq!(first.json::<Value>(), second.json::<Value>());
}

#[tokio::test]
async fn failed_location_is_absent_and_shape_is_nested() {
    let forecasts = Arc::new(MockForecasts::new().failing_for("B"));
    let server = create_test_server(create_state(MockRegistry::new(COAST), forecasts));

    let response = server.get("/api/weather").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "A": {
            "coordinates": {"lat": 18.95, "lon": 72.8258},
            "wind": {"speed": 10.0, "direction": null},
            "marine": {"waveHeight": 1.2, "seaSurfaceTemperature": 28.4}
        }
    }));
}

#[tokio::test]
async fn pull_returns_empty_object_when_refresh_cannot_run() {
    let server = create_test_server(create_state(
        MockRegistry::failing(),
        Arc::new(MockForecasts::new()),
    ));

    let response = server.get("/api/weather").await;

    response.assert_status_ok();
    response.assert_json(&json!({}));
}

#[tokio::test]
async fn single_location_lookup() {
    let server = create_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::new(MockForecasts::new()),
    ));

    let response = server.get("/api/weather/A").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["marine"]["waveHeight"], 1.2);

    let response = server.get("/api/weather/Atlantis").await;
    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["code"], "not_found");
}

// ============================================================================
// Force Refresh
// ============================================================================

#[tokio::test]
async fn refresh_returns_message_and_data() {
    let forecasts = Arc::new(MockForecasts::new());
    let server = create_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::clone(&forecasts),
    ));

    let response = server.post("/api/weather/refresh").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Weather data refreshed");
    assert_eq!(body["data"]["A"]["wind"]["speed"], 10.0);
    assert_eq!(body["data"]["B"]["marine"]["seaSurfaceTemperature"], 28.4);

    server.post("/api/weather/refresh").await.assert_status_ok();
    assert_eq!(forecasts.calls(), 4);
}

#[tokio::test]
async fn get_on_refresh_path_is_method_not_allowed() {
    let forecasts = Arc::new(MockForecasts::new());
    let server = create_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::clone(&forecasts),
    ));

    let response = server.get("/api/weather/refresh").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(forecasts.calls(), 0);
}

#[tokio::test]
async fn refresh_failure_returns_500() {
    let server = create_test_server(create_state(
        MockRegistry::failing(),
        Arc::new(MockForecasts::new()),
    ));

    let response = server.post("/api/weather/refresh").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to refresh weather data");
    assert_eq!(body["code"], "internal_error");
    assert!(
        body["details"]
            .as_str()
            .expect("details")
            .contains("registry offline")
    );
}

#[tokio::test]
async fn concurrent_triggers_share_one_cycle() {
    let forecasts = Arc::new(MockForecasts::new().with_delay(Duration::from_millis(100)));
    let state = create_state(MockRegistry::new(COAST), Arc::clone(&forecasts));
    let refresh = Arc::clone(&state.refresh);
    let server = create_test_server(state);

    let scheduled = tokio::spawn(async move { refresh.refresh().await });
    tokio::time::sleep(Duration::from_millis(20)).await;

    let forced = server.post("/api/weather/refresh").await;
    let scheduled = scheduled
        .await
        .expect("task")
        .expect("scheduled refresh");

    forced.assert_status_ok();
    assert_eq!(forecasts.calls(), 2);
    assert_eq!(scheduled.cycle(), 1);
    let body: Value = forced.json();
    assert_eq!(
        body["data"],
        serde_json::to_value(scheduled.stations()).expect("serialize")
    );
}

// ============================================================================
// Push Channel
// ============================================================================

#[tokio::test]
async fn push_channel_greets_then_streams_updates() {
    let state = create_state(MockRegistry::new(COAST), Arc::new(MockForecasts::new()));
    let publisher = Arc::clone(state.refresh.publisher());
    let server = create_ws_test_server(state);

    let mut websocket = server
        .get_websocket("/ws")
        .await
        .into_websocket()
        .await;

    let welcome: Value = websocket.receive_json().await;
    assert_eq!(
        welcome,
        json!({"event": "welcome", "data": "Connected to coastal monitoring server!"})
    );

    let initial: Value = websocket.receive_json().await;
    assert_eq!(initial, json!({"event": "weather_update", "data": {}}));
    assert_eq!(publisher.subscriber_count(), 1);

    server.post("/api/weather/refresh").await.assert_status_ok();

    let update: Value = websocket.receive_json().await;
    assert_eq!(update["event"], "weather_update");
    assert_eq!(update["data"]["A"]["marine"]["waveHeight"], 1.2);
    assert!(update["data"]["B"].is_object());

    websocket.close().await;
    for _ in 0..50 {
        if publisher.subscriber_count() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(publisher.subscriber_count(), 0);
}

#[tokio::test]
async fn late_subscriber_receives_current_snapshot() {
    let state = create_state(MockRegistry::new(COAST), Arc::new(MockForecasts::new()));
    let server = create_ws_test_server(state);

    server.post("/api/weather/refresh").await.assert_status_ok();

    let mut websocket = server
        .get_websocket("/ws")
        .await
        .into_websocket()
        .await;

    let _welcome: Value = websocket.receive_json().await;
    let initial: Value = websocket.receive_json().await;
    assert_eq!(initial["event"], "weather_update");
    assert_eq!(initial["data"]["A"]["wind"]["speed"], 10.0);
}

#[tokio::test]
async fn push_channel_closes_when_publisher_shuts_down() {
    let state = create_state(MockRegistry::new(COAST), Arc::new(MockForecasts::new()));
    let publisher = Arc::clone(state.refresh.publisher());
    let server = create_ws_test_server(state);

    let mut websocket = server
        .get_websocket("/ws")
        .await
        .into_websocket()
        .await;
    let _welcome: Value = websocket.receive_json().await;
    let _initial: Value = websocket.receive_json().await;

    assert_eq!(publisher.close_all(), 1);

    match websocket.receive_message().await {
        WsMessage::Close(Some(frame)) => {
            assert_eq!(frame.reason.to_string(), "Server shutting down");
        },
        other => panic!("expected close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn push_channel_rejects_unknown_origin() {
    let server = create_ws_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::new(MockForecasts::new()),
    ));

    let response = server
        .get_websocket("/ws")
        .add_header(ORIGIN, HeaderValue::from_static("http://evil.example"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn push_channel_accepts_listed_origin() {
    let server = create_ws_test_server(create_state(
        MockRegistry::new(COAST),
        Arc::new(MockForecasts::new()),
    ));

    let mut websocket = server
        .get_websocket("/ws")
        .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5173"))
        .await
        .into_websocket()
        .await;

    let welcome: Value = websocket.receive_json().await;
    assert_eq!(welcome["event"], "welcome");
}
