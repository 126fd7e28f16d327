//! Application state shared across handlers

use std::sync::Arc;

use application::RefreshService;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Refresh orchestrator; also owns the cache and the publisher
    pub refresh: Arc<RefreshService>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Bundle the shared services
    pub fn new(refresh: Arc<RefreshService>, config: Arc<AppConfig>) -> Self {
        Self { refresh, config }
    }
}
