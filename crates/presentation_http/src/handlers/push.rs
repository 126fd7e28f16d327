//! WebSocket push channel
//!
//! Each connection greets the client, registers with the publisher, and then
//! forwards every snapshot the publisher queues for it as a `weather_update`
//! event. The publisher never sees the socket.

use std::sync::Arc;

use application::{SubscriberState, Subscription};
use axum::{
    extract::{
        State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::{HeaderMap, header::ORIGIN},
    response::{IntoResponse, Response},
};
use domain::WeatherSnapshot;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{error::ApiError, handlers::weather::WeatherPayload, state::AppState};

/// Greeting sent before anything else
pub const WELCOME_MESSAGE: &str = "Connected to coastal monitoring server!";

/// Close reason sent when the server stops publishing
pub const SHUTDOWN_REASON: &str = "Server shutting down";

/// Envelope for every server-to-client message
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PushEvent {
    Welcome(&'static str),
    WeatherUpdate(WeatherPayload),
}

impl PushEvent {
    fn to_message(&self) -> Option<Message> {
        match serde_json::to_string(self) {
            Ok(json) => Some(Message::Text(json.into())),
            Err(e) => {
                warn!(error = %e, "Failed to encode push event");
                None
            },
        }
    }
}

/// `GET /ws`
///
/// Refuses the upgrade with 403 when the request carries an `Origin` that is
/// not in the allowed list.
pub async fn push_channel(
    ws: WebSocketUpgrade,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    if let Some(origin) = headers.get(ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !state.config.server.is_origin_allowed(origin) {
            warn!(origin, "Push channel origin rejected");
            return Err(ApiError::Forbidden(format!("Origin {origin} is not allowed")));
        }
    }

    debug!(state = %SubscriberState::Connecting, "Push channel upgrade accepted");
    Ok(ws
        .on_upgrade(move |socket| handle_socket(socket, state))
        .into_response())
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    if let Some(greeting) = PushEvent::Welcome(WELCOME_MESSAGE).to_message() {
        if socket.send(greeting).await.is_err() {
            debug!("Client left before greeting");
            return;
        }
    }

    let mut subscription = state.refresh.publisher().subscribe();
    info!(subscriber = %subscription.id(), "Push client connected");

    loop {
        tokio::select! {
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {},
            },
            update = subscription.recv() => {
                let Some(snapshot) = update else {
                    close_for_shutdown(&mut socket, &subscription).await;
                    break;
                };
                if !forward(&mut socket, &subscription, snapshot).await {
                    break;
                }
            }
        }
    }

    subscription.close();
    info!(
        subscriber = %subscription.id(),
        state = %subscription.state(),
        "Push client disconnected"
    );
}

/// Send one snapshot; `false` once the socket is gone
async fn forward(
    socket: &mut WebSocket,
    subscription: &Subscription,
    snapshot: Arc<WeatherSnapshot>,
) -> bool {
    let cycle = snapshot.cycle();
    let Some(message) = PushEvent::WeatherUpdate(WeatherPayload(snapshot)).to_message() else {
        return true;
    };
    if socket.send(message).await.is_err() {
        return false;
    }
    debug!(subscriber = %subscription.id(), cycle, "Weather update pushed");
    true
}

/// The publisher released this subscriber; tell the client before hanging up
async fn close_for_shutdown(socket: &mut WebSocket, subscription: &Subscription) {
    let frame = CloseFrame {
        code: close_code::AWAY,
        reason: Utf8Bytes::from_static(SHUTDOWN_REASON),
    };
    if socket.send(Message::Close(Some(frame))).await.is_err() {
        debug!(subscriber = %subscription.id(), "Client already gone at shutdown");
    }
}
