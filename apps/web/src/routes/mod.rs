pub mod health;

use axum::{
    routing::{any, get, patch, post, put},
    Router,
};

use crate::admin::handlers as admin;
use crate::content::handlers as content;
use crate::layout::handlers as layout;
use crate::proxy;
use crate::scroll::handlers as scroll;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Layout API
        .route("/api/v1/layout", post(layout::handle_layout))
        .route("/api/v1/layout/config", get(layout::handle_layout_config))
        // Public collection pages
        .route("/api/v1/collections", get(content::handle_list_collections))
        .route(
            "/api/v1/collections/:slug/layout",
            get(content::handle_collection_layout),
        )
        // Admin editing
        .route(
            "/api/v1/admin/schema/collection",
            get(admin::handle_collection_schema),
        )
        .route(
            "/api/v1/admin/schema/image-block",
            get(admin::handle_image_block_schema),
        )
        .route(
            "/api/v1/admin/collections/:id",
            put(admin::handle_update_collection),
        )
        .route(
            "/api/v1/admin/collections/:id/reorder",
            put(admin::handle_reorder_blocks),
        )
        .route(
            "/api/v1/admin/collections/:id/blocks/:block_id",
            patch(admin::handle_update_block).delete(admin::handle_delete_block),
        )
        // Scroll restoration
        .route(
            "/api/v1/scroll/:session_id",
            put(scroll::handle_save_scroll)
                .get(scroll::handle_get_scroll)
                .delete(scroll::handle_clear_scroll),
        )
        // Same-origin access to the content backend
        .route("/api/proxy/*path", any(proxy::handle_proxy))
        .with_state(state)
}
