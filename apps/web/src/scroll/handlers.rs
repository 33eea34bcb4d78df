//! Axum route handlers for scroll restoration.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::scroll::ScrollEntry;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveScrollRequest {
    pub path: String,
    pub y: f64,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollPosition {
    pub path: String,
    #[serde(flatten)]
    pub entry: ScrollEntry,
}

/// PUT /api/v1/scroll/:session_id
pub async fn handle_save_scroll(
    State(state): State<AppState>,
    session: Result<Path<Uuid>, PathRejection>,
    Json(request): Json<SaveScrollRequest>,
) -> Result<Json<ScrollPosition>, AppError> {
    let Path(session_id) = session?;
    if request.path.is_empty() {
        return Err(AppError::Validation("path cannot be empty".to_string()));
    }
    if !request.y.is_finite() || request.y < 0.0 {
        return Err(AppError::Validation(format!(
            "y must be a non-negative number, got {}",
            request.y
        )));
    }

    let entry = state.scroll.save(session_id, &request.path, request.y);
    Ok(Json(ScrollPosition {
        path: request.path,
        entry,
    }))
}

/// GET /api/v1/scroll/:session_id?path=
pub async fn handle_get_scroll(
    State(state): State<AppState>,
    session: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<Json<ScrollPosition>, AppError> {
    let Path(session_id) = session?;
    let Query(query) = query?;
    let path = query
        .path
        .ok_or_else(|| AppError::Validation("path query parameter is required".to_string()))?;

    let entry = state
        .scroll
        .get(session_id, &path)
        .ok_or_else(|| AppError::NotFound(format!("No scroll position saved for '{path}'")))?;
    Ok(Json(ScrollPosition { path, entry }))
}

/// DELETE /api/v1/scroll/:session_id?path=
///
/// Without `path`, forgets every position saved for the session.
pub async fn handle_clear_scroll(
    State(state): State<AppState>,
    session: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PathQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let Path(session_id) = session?;
    let Query(query) = query?;
    state.scroll.clear(session_id, query.path.as_deref());
    Ok(StatusCode::NO_CONTENT)
}
