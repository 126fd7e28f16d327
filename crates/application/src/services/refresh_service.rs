//! Refresh orchestrator
//!
//! Runs refresh cycles: fetch every registered location concurrently, build a
//! new `WeatherSnapshot` from the successes, swap it into the cache and
//! broadcast it. At most one cycle runs at a time; triggers that arrive while
//! a cycle is in flight wait for that cycle and share its result.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use domain::{ForecastSnapshot, Location, WeatherSnapshot};
use futures::future::{BoxFuture, FutureExt, Shared, join_all};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{ApplicationError, RefreshError};
use crate::ports::{ForecastPort, LocationRegistryPort};
use crate::services::{Publisher, WeatherCache};

/// Result every caller of a refresh cycle receives
pub type RefreshResult = Result<Arc<WeatherSnapshot>, RefreshError>;

type SharedCycle = Shared<BoxFuture<'static, RefreshResult>>;

/// Result of fetching one location during a cycle
#[derive(Debug)]
pub struct FetchOutcome {
    /// Location that was fetched
    pub location: Location,
    /// Snapshot on success, reason on failure
    pub result: Result<ForecastSnapshot, ApplicationError>,
}

impl FetchOutcome {
    /// Whether the fetch produced data
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Build the cycle's snapshot from per-location outcomes
///
/// Failed locations are logged and left out; they are never carried over
/// from the previous cycle.
#[must_use]
pub fn assemble_snapshot(cycle: u64, outcomes: Vec<FetchOutcome>) -> WeatherSnapshot {
    let mut stations = BTreeMap::new();
    for outcome in outcomes {
        match outcome.result {
            Ok(snapshot) => {
                stations.insert(outcome.location.name().clone(), snapshot);
            },
            Err(e) => {
                warn!(
                    location = %outcome.location.name(),
                    cycle,
                    error = %e,
                    "Dropping location from this cycle"
                );
            },
        }
    }
    WeatherSnapshot::new(cycle, Utc::now(), stations)
}

/// Clears the in-flight marker when the cycle task ends, panics included
struct InFlightGuard(Arc<RefreshService>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.in_flight.lock().take();
    }
}

/// Drives refresh cycles and owns the single-flight guard
pub struct RefreshService {
    registry: Arc<dyn LocationRegistryPort>,
    forecasts: Arc<dyn ForecastPort>,
    cache: WeatherCache,
    publisher: Arc<Publisher>,
    in_flight: Mutex<Option<SharedCycle>>,
}

impl fmt::Debug for RefreshService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshService")
            .field("cycle", &self.cache.get().cycle())
            .field("in_flight", &self.is_refreshing())
            .finish_non_exhaustive()
    }
}

impl RefreshService {
    /// Create the orchestrator
    pub fn new(
        registry: Arc<dyn LocationRegistryPort>,
        forecasts: Arc<dyn ForecastPort>,
        cache: WeatherCache,
        publisher: Arc<Publisher>,
    ) -> Self {
        Self {
            registry,
            forecasts,
            cache,
            publisher,
            in_flight: Mutex::new(None),
        }
    }

    /// The cache this service writes to
    #[must_use]
    pub const fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// The publisher notified after every cycle
    #[must_use]
    pub const fn publisher(&self) -> &Arc<Publisher> {
        &self.publisher
    }

    /// Whether a cycle is currently running
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight.lock().is_some()
    }

    /// Run a refresh cycle, or join the one already in flight
    ///
    /// The cycle runs on its own task and completes even if every caller
    /// stops waiting. On failure the cache is left as it was.
    pub async fn refresh(self: &Arc<Self>) -> RefreshResult {
        let (cycle, start) = {
            let mut in_flight = self.in_flight.lock();
            if let Some(cycle) = in_flight.as_ref() {
                debug!("Joining in-flight refresh cycle");
                (cycle.clone(), None)
            } else {
                let (done, result) = oneshot::channel();
                let cycle = Self::await_cycle(result);
                *in_flight = Some(cycle.clone());
                (cycle, Some(done))
            }
        };

        // The marker lock is released here; the guard may drop inside `spawn`
        if let Some(done) = start {
            self.spawn_cycle(done);
        }
        cycle.await
    }

    /// Current snapshot, refreshing first when the cache holds no locations
    ///
    /// Never fails: if the lazy refresh fails, the (empty) cache is returned.
    pub async fn current_or_refresh(self: &Arc<Self>) -> Arc<WeatherSnapshot> {
        let current = self.cache.get();
        if !current.is_empty() {
            return current;
        }

        debug!("Cache empty, refreshing before answering");
        match self.refresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Lazy refresh failed, serving current cache");
                self.cache.get()
            },
        }
    }

    fn await_cycle(result: oneshot::Receiver<RefreshResult>) -> SharedCycle {
        async move {
            result.await.unwrap_or_else(|_| {
                Err(RefreshError::Aborted(
                    "cycle task ended without a result".into(),
                ))
            })
        }
        .boxed()
        .shared()
    }

    fn spawn_cycle(self: &Arc<Self>, done: oneshot::Sender<RefreshResult>) {
        let guard = InFlightGuard(Arc::clone(self));
        tokio::spawn(async move {
            let result = guard.0.run_cycle().await;
            drop(guard);
            let _ = done.send(result);
        });
    }

    #[instrument(skip(self), fields(cycle))]
    async fn run_cycle(&self) -> RefreshResult {
        let started = Instant::now();
        let cycle = self.cache.get().cycle() + 1;
        tracing::Span::current().record("cycle", cycle);

        let locations = self.registry.locations().await.map_err(|e| {
            error!(error = %e, "Refresh cycle failed, keeping previous cache");
            RefreshError::LocationsUnavailable(e.to_string())
        })?;

        let outcomes = self.fetch_all(locations).await;
        let attempted = outcomes.len();
        let failed = outcomes.iter().filter(|o| !o.is_success()).count();

        let snapshot = Arc::new(assemble_snapshot(cycle, outcomes));
        self.cache.replace(Arc::clone(&snapshot));
        let report = self.publisher.broadcast(&snapshot);

        info!(
            cycle,
            locations = snapshot.len(),
            attempted,
            failed,
            subscribers = report.delivered,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Refresh cycle complete"
        );
        Ok(snapshot)
    }

    async fn fetch_all(&self, locations: Vec<Location>) -> Vec<FetchOutcome> {
        let fetches = locations.into_iter().map(|location| async move {
            let result = self.forecasts.fetch_forecast(&location).await;
            FetchOutcome { location, result }
        });
        join_all(fetches).await
    }
}
