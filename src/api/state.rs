//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::ApiConfig;
use crate::dashboard::Dashboard;
use crate::dataset::Datasets;
use crate::websocket::{HubConfig, SessionHub};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded datasets, never mutated after startup
    pub datasets: Arc<Datasets>,
    /// Static panels computed at startup
    pub dashboard: Arc<Dashboard>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket session hub
    pub ws_hub: Arc<SessionHub>,
}

impl AppState {
    /// Create the state, computing the dashboard from the datasets
    pub fn new(datasets: Datasets, config: ApiConfig) -> Self {
        let dashboard = Dashboard::build(&datasets);
        Self::with_dashboard(Arc::new(datasets), Arc::new(dashboard), config)
    }

    /// Create the state from an already built dashboard
    pub fn with_dashboard(
        datasets: Arc<Datasets>,
        dashboard: Arc<Dashboard>,
        config: ApiConfig,
    ) -> Self {
        let hub_config = HubConfig {
            max_connections: config.max_sessions,
        };

        Self {
            datasets,
            dashboard,
            config: Arc::new(config),
            start_time: Instant::now(),
            ws_hub: Arc::new(SessionHub::new(hub_config)),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
