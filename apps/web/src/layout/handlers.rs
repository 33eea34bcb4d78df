//! Axum route handlers for the layout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::layout::constants::{LayoutConfig, Viewport};
use crate::layout::engine::{layout_blocks, Row};
use crate::models::block::{BlockId, ContentBlock};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    pub blocks: Vec<ContentBlock>,
    pub container_width: u32,
    /// Overrides the breakpoint-derived viewport class when present.
    #[serde(default)]
    pub is_mobile: Option<bool>,
    #[serde(default)]
    pub cover_id: Option<BlockId>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResponse {
    pub viewport: Viewport,
    pub rows: Vec<Row>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/layout/config
pub async fn handle_layout_config(State(state): State<AppState>) -> Json<LayoutConfig> {
    Json(state.layout.clone())
}

/// POST /api/v1/layout
///
/// Packs caller-supplied blocks into rows for the given container width.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResponse>, AppError> {
    let viewport = resolve_viewport(request.container_width, request.is_mobile, &state.layout)?;
    let rows = layout_blocks(
        &request.blocks,
        viewport,
        request.cover_id.as_ref(),
        &state.layout,
    );
    Ok(Json(LayoutResponse { viewport, rows }))
}

/// Validates a requested container width and classifies the viewport.
pub fn resolve_viewport(
    width: u32,
    is_mobile: Option<bool>,
    config: &LayoutConfig,
) -> Result<Viewport, AppError> {
    if width == 0 || width > config.max_container_width {
        return Err(AppError::Validation(format!(
            "container width must be between 1 and {} pixels, got {width}",
            config.max_container_width
        )));
    }

    let viewport = Viewport::from_width(width, config);
    Ok(match is_mobile {
        Some(is_mobile) => Viewport {
            width,
            is_mobile,
        },
        None => viewport,
    })
}
