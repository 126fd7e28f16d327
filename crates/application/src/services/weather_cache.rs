//! In-memory weather cache
//!
//! Holds the latest `WeatherSnapshot` behind a single atomically swapped
//! pointer. Readers never block the writer and always see one complete
//! snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use domain::WeatherSnapshot;

/// Process-wide store of the most recent refresh result
///
/// Cheap to clone; clones share the same underlying slot.
#[derive(Debug, Clone)]
pub struct WeatherCache {
    inner: Arc<ArcSwap<WeatherSnapshot>>,
}

impl WeatherCache {
    /// Create an empty cache (cycle 0, no locations)
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(WeatherSnapshot::empty())),
        }
    }

    /// Current snapshot
    #[must_use]
    pub fn get(&self) -> Arc<WeatherSnapshot> {
        self.inner.load_full()
    }

    /// Swap in a new snapshot, returning the one it replaced
    ///
    /// Only the refresh orchestrator writes to the cache.
    pub(crate) fn replace(&self, snapshot: Arc<WeatherSnapshot>) -> Arc<WeatherSnapshot> {
        self.inner.swap(snapshot)
    }
}

impl Default for WeatherCache {
    fn default() -> Self {
        Self::new()
    }
}
