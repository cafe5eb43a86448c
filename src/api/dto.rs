//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetStats;
use crate::view::{SchoolMap, ViewState};
use crate::websocket::SessionStats;

// ============================================
// SCHOOL MAP DTOs
// ============================================

/// Query parameters of the stateless school map render
#[derive(Debug, Default, Deserialize)]
pub struct SchoolMapParams {
    /// District name; empty or absent means all districts
    #[serde(default)]
    pub district: Option<String>,
}

/// School map rendered for one selection
#[derive(Debug, Serialize)]
pub struct SchoolMapResponse {
    /// State the selection led to
    pub state: ViewState,
    /// False when the selection was not a known district
    pub applied: bool,
    #[serde(flatten)]
    pub map: SchoolMap,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy" or "degraded"
    pub status: String,
    /// Row counts of the loaded datasets
    pub datasets: DatasetStats,
    /// Open WebSocket sessions
    pub sessions: SessionStats,
    /// When the static panels were computed
    pub dashboard_generated_at: DateTime<Utc>,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
