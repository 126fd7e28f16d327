//! Complete cache contents produced by one refresh cycle

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entities::ForecastSnapshot;
use crate::value_objects::LocationName;

/// Mapping from location name to forecast, as assembled by one refresh cycle
///
/// Cycle `0` is the empty snapshot the process starts with. Every completed
/// refresh produces a snapshot with a strictly greater cycle number, which lets
/// subscribers discard anything they have already seen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    cycle: u64,
    refreshed_at: Option<DateTime<Utc>>,
    stations: BTreeMap<LocationName, ForecastSnapshot>,
}

impl WeatherSnapshot {
    /// The snapshot held before any refresh has completed
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cycle: 0,
            refreshed_at: None,
            stations: BTreeMap::new(),
        }
    }

    /// Create the snapshot for a completed refresh cycle
    #[must_use]
    pub const fn new(
        cycle: u64,
        refreshed_at: DateTime<Utc>,
        stations: BTreeMap<LocationName, ForecastSnapshot>,
    ) -> Self {
        Self {
            cycle,
            refreshed_at: Some(refreshed_at),
            stations,
        }
    }

    /// Refresh cycle that produced this snapshot
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// When the producing cycle finished, `None` for the initial snapshot
    #[must_use]
    pub const fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Per-location forecasts keyed by name
    #[must_use]
    pub const fn stations(&self) -> &BTreeMap<LocationName, ForecastSnapshot> {
        &self.stations
    }

    /// Look up one location
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ForecastSnapshot> {
        self.stations.get(name)
    }

    /// Number of locations present
    #[must_use]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether no location has data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}
