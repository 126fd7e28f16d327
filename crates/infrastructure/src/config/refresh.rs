//! Refresh schedule configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Periodic refresh configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Seconds between scheduled refresh cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    /// Run a cycle as soon as the scheduler starts
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

const fn default_interval() -> u64 {
    300
}

const fn default_true() -> bool {
    true
}

impl RefreshConfig {
    /// Interval between scheduled cycles
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            run_on_startup: true,
        }
    }
}
