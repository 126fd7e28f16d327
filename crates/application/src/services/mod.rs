//! Application services - Use case implementations

mod publication;
mod refresh_service;
mod weather_cache;

pub use publication::{
    BroadcastReport, DEFAULT_SUBSCRIBER_QUEUE, Publisher, SubscriberId, SubscriberState,
    Subscription,
};
pub use refresh_service::{FetchOutcome, RefreshResult, RefreshService, assemble_snapshot};
pub use weather_cache::WeatherCache;
