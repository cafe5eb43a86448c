//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Page layout with every static figure
//! - GET /api/v1/panels/:id - One static figure
//! - GET /api/v1/districts - District dropdown options

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{district_options, DistrictOption, PanelId};

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Response {
    Json(state.dashboard.as_ref()).into_response()
}

/// GET /api/v1/panels/:id
///
/// Only chart panels have a static figure; the school search panel is
/// rendered through `/api/v1/school-map` or the WebSocket.
pub async fn get_panel(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let panel: PanelId = id
        .parse()
        .map_err(|_| ApiError::NotFound(format!("Panel '{}' not found", id)))?;

    let figure = state
        .dashboard
        .figure(panel)
        .ok_or_else(|| ApiError::NotFound(format!("Panel '{}' has no static figure", id)))?;

    Ok(Json(figure).into_response())
}

/// GET /api/v1/districts
pub async fn list_districts() -> Json<Vec<DistrictOption>> {
    Json(district_options())
}
