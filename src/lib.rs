//! # Schooldash
//!
//! Schools of Berlin - a dashboard server for school, student and
//! extracurricular activity statistics with an interactive district map.
//!
//! ## Features
//!
//! - **Dataset loading**: CSV, XLSX and GeoJSON sources loaded once at startup
//! - **Aggregation**: Pure groupby/count/sum reductions, independent of rendering
//! - **Charts**: Plotly-compatible figure descriptions for every panel
//! - **Interactive search**: Per-session district filter over WebSocket
//!
//! ## Modules
//!
//! - [`dataset`]: Record types, the `Datasets` context and loaders
//! - [`aggregate`]: Grouping primitives and dashboard summaries
//! - [`chart`]: Figure types and panel builders
//! - [`dashboard`]: Page layout of all static panels
//! - [`view`]: The district filter state machine
//! - [`api`]: HTTP server with Axum
//! - [`websocket`]: Interaction channel for view sessions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schooldash::dataset::{load_datasets, DataSources};
//! use schooldash::dashboard::{Dashboard, PanelId};
//! use schooldash::view::{reduce, ViewState};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let datasets = load_datasets(&DataSources::in_dir("./data"))?;
//!
//!     // Static panels
//!     let dashboard = Dashboard::build(&datasets);
//!     let top = dashboard.figure(PanelId::TopActivities);
//!     println!("{} traces", top.map(|f| f.trace_count()).unwrap_or(0));
//!
//!     // The school map after picking a district
//!     let update = reduce(&datasets, ViewState::Unfiltered, Some("Mitte"));
//!     if let Some(map) = update.output {
//!         println!("{} schools in Mitte", map.schools);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod view;
pub mod websocket;

// Re-export top-level types for convenience
pub use dataset::{
    load_datasets, ActivityRecord, DataSources, DatasetError, DatasetResult, Datasets, District,
    SchoolRecord, StudentRecord,
};

pub use aggregate::{count_by, per_entity_activity_count, sum_by, top_n_by_count, Tally};

pub use chart::Figure;

pub use dashboard::{Dashboard, PanelId};

pub use view::{reduce, SchoolMap, ViewSession, ViewState, ViewUpdate};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, HubConfig, HubError, ServerMessage, SessionHub};

pub use config::{ApiConfig, Config, ConfigError, DataConfig, DefaultConfig, LoggingConfig};
