//! Axum route handlers for the admin editing surface.
//!
//! Every write is validated against its form schema here before it is
//! forwarded to the backend, so malformed edits never leave this service.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::admin::schema::{
    collection_form, image_block_form, validate_form, validate_order, FieldSpec,
};
use crate::errors::AppError;
use crate::models::block::{BlockId, ContentBlock};
use crate::models::collection::{BlockOrder, BlockUpdate, Collection, CollectionUpdate};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Schemas
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/admin/schema/collection
pub async fn handle_collection_schema() -> Json<Vec<FieldSpec>> {
    Json(collection_form())
}

/// GET /api/v1/admin/schema/image-block
pub async fn handle_image_block_schema() -> Json<Vec<FieldSpec>> {
    Json(image_block_form())
}

// ────────────────────────────────────────────────────────────────────────────
// Writes
// ────────────────────────────────────────────────────────────────────────────

/// PUT /api/v1/admin/collections/:id
///
/// Validates the collection metadata form and forwards it as a partial update.
pub async fn handle_update_collection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<Value>,
) -> Result<Json<Collection>, AppError> {
    let fields = validate_form(&collection_form(), &form).map_err(AppError::InvalidForm)?;
    let update: CollectionUpdate = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::Validation(format!("Malformed collection form: {e}")))?;

    let collection = state.content.update_collection(id, &update).await?;
    info!(collection_id = id, slug = %collection.slug, "Collection metadata updated");
    Ok(Json(collection))
}

/// PUT /api/v1/admin/collections/:id/reorder
pub async fn handle_reorder_blocks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(order): Json<Vec<BlockOrder>>,
) -> Result<Json<Collection>, AppError> {
    validate_order(&order).map_err(AppError::InvalidForm)?;

    let collection = state.content.reorder_blocks(id, &order).await?;
    info!(collection_id = id, blocks = order.len(), "Blocks reordered");
    Ok(Json(collection))
}

/// PATCH /api/v1/admin/collections/:id/blocks/:block_id
pub async fn handle_update_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(i64, String)>,
    Json(form): Json<Value>,
) -> Result<Json<ContentBlock>, AppError> {
    let fields = validate_form(&image_block_form(), &form).map_err(AppError::InvalidForm)?;
    let update: BlockUpdate = serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::Validation(format!("Malformed block form: {e}")))?;

    let block_id = BlockId::from_segment(&block_id);
    let block = state.content.update_block(id, &block_id, &update).await?;
    info!(
        collection_id = id,
        block_id = %block_id,
        block_type = block.block_type(),
        "Block metadata updated"
    );
    Ok(Json(block))
}

/// DELETE /api/v1/admin/collections/:id/blocks/:block_id
pub async fn handle_delete_block(
    State(state): State<AppState>,
    Path((id, block_id)): Path<(i64, String)>,
) -> Result<StatusCode, AppError> {
    let block_id = BlockId::from_segment(&block_id);
    state.content.delete_block(id, &block_id).await?;
    info!(collection_id = id, block_id = %block_id, "Block deleted");
    Ok(StatusCode::NO_CONTENT)
}
