//! Presentation Layer
//!
//! Turns aggregation results into Plotly figure descriptions.
//!
//! - **figure**: figures assembled from `plotly` plots plus the trace kinds it lacks
//! - **panels**: one builder per static dashboard panel
//! - **school_map**: the school location map driven by the district filter

pub mod figure;
pub mod panels;
pub mod school_map;

pub use figure::{Figure, Frame, Trace};
pub use school_map::school_locations;
