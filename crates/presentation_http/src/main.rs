//! Coastal relay HTTP server
//!
//! Main entry point: loads configuration, wires the refresh pipeline and
//! serves the pull API and push channel.

use std::{sync::Arc, time::Duration};

use anyhow::Context;
use application::{Publisher, RefreshService, WeatherCache};
use axum::http::{HeaderValue, Method};
use infrastructure::{
    AppConfig, OpenMeteoForecastAdapter, ServerConfig, StaticLocationRegistry, init_tracing,
};
use integration_weather::WeatherConfig;
use presentation_http::{routes, spawn_refresh_scheduler, state::AppState};
use tokio::{net::TcpListener, signal, sync::Notify};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Invalid configuration aborts startup
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server)?;

    info!("🌊 Coastal relay v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        host = %config.server.host,
        port = %config.server.port,
        locations = config.locations.len(),
        interval_secs = config.refresh.interval_secs,
        "Configuration loaded"
    );

    let registry = StaticLocationRegistry::new(config.to_locations()?)?;
    let forecasts = OpenMeteoForecastAdapter::with_config(WeatherConfig::from(&config.upstream))?;

    let cache = WeatherCache::new();
    let publisher = Arc::new(Publisher::new(cache.clone()));
    let refresh = Arc::new(RefreshService::new(
        Arc::new(registry),
        Arc::new(forecasts),
        cache,
        Arc::clone(&publisher),
    ));

    let config = Arc::new(config);
    let scheduler = spawn_refresh_scheduler(Arc::clone(&refresh), &config.refresh);

    let app = routes::create_router(AppState::new(refresh, Arc::clone(&config)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server));

    let addr = config.server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("🚀 Server listening on http://{}", addr);
    info!("📡 Push channel: ws://{}/ws", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);
    let draining = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(
            Arc::clone(&draining),
            publisher,
            shutdown_timeout,
        ))
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = async {
            draining.notified().await;
            tokio::time::sleep(shutdown_timeout).await;
        } => warn!("⌛ Shutdown timeout elapsed, dropping remaining connections"),
    }

    scheduler.stop().await;
    info!("👋 Server shutdown complete");

    Ok(())
}

/// CORS from the allowed origin list; empty list allows any origin
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and start draining
///
/// Closing the publisher ends every push connection, so open WebSockets do
/// not hold the drain open until the timeout.
async fn shutdown_signal(draining: Arc<Notify>, publisher: Arc<Publisher>, timeout: Duration) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("📥 Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("📥 Received SIGTERM, initiating graceful shutdown...");
        }
    }

    let released = publisher.close_all();
    info!(
        push_clients = released,
        "⏳ Waiting up to {:?} for connections to close...", timeout
    );
    draining.notify_one();
}
