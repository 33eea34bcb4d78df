//! Axum route handlers for public collection pages.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::content::view::{build_collection_layout, CollectionLayout};
use crate::errors::AppError;
use crate::layout::handlers::resolve_viewport;
use crate::models::collection::{CollectionSummary, CollectionType};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub kind: Option<CollectionType>,
}

#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    pub width: u32,
    #[serde(default)]
    pub mobile: Option<bool>,
}

/// GET /api/v1/collections?type=
///
/// Lists visible collections, optionally filtered by type.
pub async fn handle_list_collections(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<CollectionSummary>>, AppError> {
    let Query(params) = query?;
    let collections = state.content.list_collections(params.kind).await?;
    Ok(Json(
        collections
            .into_iter()
            .filter(|collection| collection.visible)
            .collect(),
    ))
}

/// GET /api/v1/collections/:slug/layout?width=&mobile=
///
/// Fetches a collection and returns its rows laid out for the given width.
/// Hidden collections are reported as missing.
pub async fn handle_collection_layout(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    query: Result<Query<LayoutQuery>, QueryRejection>,
) -> Result<Json<CollectionLayout>, AppError> {
    let Query(params) = query?;
    let viewport = resolve_viewport(params.width, params.mobile, &state.layout)?;

    let collection = state.content.collection(&slug).await?;
    if !collection.visible {
        return Err(AppError::NotFound(format!("Collection '{slug}' not found")));
    }

    let layout = build_collection_layout(&collection, viewport, &state.layout);
    info!(
        slug = %slug,
        blocks = collection.blocks.len(),
        rows = layout.rows.len(),
        width = viewport.width,
        mobile = viewport.is_mobile,
        "Collection laid out"
    );
    Ok(Json(layout))
}
