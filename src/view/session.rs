//! Selection reducer and per-connection view session

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use super::state::ViewState;
use crate::chart::{school_locations, Figure};
use crate::dataset::{Datasets, District};

/// Slot on the page the school map is rendered into
pub const SCHOOL_MAP_SLOT: &str = "school-map";

/// The rendered school search output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolMap {
    /// Selected district, `None` when unfiltered
    pub district: Option<District>,
    /// Number of schools in the filtered subset
    pub schools: usize,
    pub figure: Figure,
}

/// Result of feeding one selection into the reducer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub state: ViewState,
    /// `None` when the selection was rejected
    pub output: Option<SchoolMap>,
}

/// Render the school map for a state
pub fn render(datasets: &Datasets, state: ViewState) -> SchoolMap {
    let schools = state.filter(datasets.schools());
    SchoolMap {
        district: state.district(),
        schools: schools.len(),
        figure: school_locations(&schools),
    }
}

/// Apply a dropdown selection to the current state
///
/// Rejected selections keep the state and produce no output.
pub fn reduce(datasets: &Datasets, state: ViewState, selection: Option<&str>) -> ViewUpdate {
    match ViewState::next(selection) {
        Some(next) => ViewUpdate {
            state: next,
            output: Some(render(datasets, next)),
        },
        None => {
            debug!(
                selection = selection.unwrap_or_default(),
                current = ?state,
                "Ignoring selection outside the district set"
            );
            ViewUpdate {
                state,
                output: None,
            }
        }
    }
}

/// The filter state of one connected page
///
/// Each session starts unfiltered and is never shared between connections.
pub struct ViewSession {
    datasets: Arc<Datasets>,
    state: ViewState,
}

impl ViewSession {
    pub fn new(datasets: Arc<Datasets>) -> Self {
        Self {
            datasets,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// The map shown before any selection
    pub fn initial_render(&self) -> SchoolMap {
        render(&self.datasets, self.state)
    }

    /// Handle one selection event, returning the new map if it was applied
    pub fn handle(&mut self, selection: Option<&str>) -> Option<SchoolMap> {
        let update = reduce(&self.datasets, self.state, selection);
        self.state = update.state;
        update.output
    }
}
