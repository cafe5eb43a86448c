//! View Routes
//!
//! - GET /api/v1/school-map?district= - Stateless school map render

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{SchoolMapParams, SchoolMapResponse};
use crate::api::state::AppState;
use crate::view::{reduce, render, ViewState};

/// GET /api/v1/school-map
///
/// Renders the state reached from a fresh session by the given selection.
/// A district outside the known set leaves the map unfiltered.
pub async fn school_map(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SchoolMapParams>,
) -> Json<SchoolMapResponse> {
    let update = reduce(
        &state.datasets,
        ViewState::Unfiltered,
        params.district.as_deref(),
    );

    let applied = update.output.is_some();
    let map = match update.output {
        Some(map) => map,
        None => render(&state.datasets, update.state),
    };

    Json(SchoolMapResponse {
        state: update.state,
        applied,
        map,
    })
}
