//! Reactive School Search
//!
//! The district dropdown drives a two-state machine (`Unfiltered` /
//! `FilteredBy(district)`) whose output is the school location map.
//!
//! - **state**: `ViewState` and its transition rule
//! - **session**: the pure reducer plus the per-connection `ViewSession`
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use schooldash::dataset::Datasets;
//! use schooldash::view::{ViewSession, ViewState};
//!
//! let mut session = ViewSession::new(Arc::new(Datasets::default()));
//! assert!(session.handle(Some("Atlantis")).is_none());
//! assert_eq!(session.state(), ViewState::Unfiltered);
//! ```

pub mod session;
pub mod state;

pub use session::{reduce, render, SchoolMap, ViewSession, ViewUpdate, SCHOOL_MAP_SLOT};
pub use state::ViewState;
