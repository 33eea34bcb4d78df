//! Shared fixtures for handler and client tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use reqwest::Client;

use crate::config::Config;
use crate::content::client::{ApiError, CollectionSource};
use crate::layout::default_layout_config;
use crate::models::block::{BlockId, BlockKind, ContentBlock, ImageBlock};
use crate::models::collection::{
    BlockOrder, BlockUpdate, Collection, CollectionSummary, CollectionType, CollectionUpdate,
};
use crate::scroll::ScrollStore;
use crate::state::AppState;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub fn test_config(backend: &str) -> Config {
    Config {
        backend_api_url: backend.trim_end_matches('/').to_string(),
        port: 0,
        rust_log: "debug".to_string(),
        proxy_timeout_secs: 5,
        proxy_max_body_bytes: 1024 * 1024,
        scroll_store_capacity: 16,
    }
}

pub fn test_state(source: Arc<MemorySource>) -> AppState {
    AppState {
        config: test_config("http://127.0.0.1:9"),
        content: source,
        http: Client::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap(),
        layout: default_layout_config(),
        scroll: ScrollStore::new(16),
    }
}

pub fn test_state_with_backend(backend: &str) -> AppState {
    AppState {
        config: test_config(backend),
        ..test_state(Arc::new(MemorySource::default()))
    }
}

pub fn image_block(id: i64, width: f64, height: f64) -> ContentBlock {
    ContentBlock {
        id: BlockId::Int(id),
        order_index: id,
        rating: None,
        kind: BlockKind::Image(ImageBlock {
            image_url: format!("https://cdn.example.com/{id}.jpg"),
            image_width: Some(width),
            image_height: Some(height),
            title: Some(format!("Frame {id}")),
            caption: None,
            alt: None,
        }),
    }
}

pub fn sample_collection(id: i64, slug: &str, visible: bool) -> Collection {
    Collection {
        id,
        slug: slug.to_string(),
        title: slug.to_uppercase(),
        collection_type: CollectionType::ArtGallery,
        description: None,
        location: None,
        collection_date: None,
        visible,
        cover_image_id: None,
        blocks: (1..=4).map(|i| image_block(i, 3000.0, 2000.0)).collect(),
    }
}

/// In-memory `CollectionSource` with the same not-found semantics as the backend.
#[derive(Default)]
pub struct MemorySource {
    collections: Mutex<Vec<Collection>>,
}

impl MemorySource {
    pub fn with(collections: Vec<Collection>) -> Self {
        Self {
            collections: Mutex::new(collections),
        }
    }

    pub fn snapshot(&self, id: i64) -> Option<Collection> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn with_collection<T>(
        &self,
        id: i64,
        f: impl FnOnce(&mut Collection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut collections = self.collections.lock().unwrap();
        let collection = collections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found("collection"))?;
        f(collection)
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Api {
        status: 404,
        message: format!("{what} not found"),
    }
}

#[async_trait]
impl CollectionSource for MemorySource {
    async fn list_collections(
        &self,
        kind: Option<CollectionType>,
    ) -> Result<Vec<CollectionSummary>, ApiError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .iter()
            .filter(|c| kind.map_or(true, |kind| c.collection_type == kind))
            .map(|c| CollectionSummary {
                id: c.id,
                slug: c.slug.clone(),
                title: c.title.clone(),
                collection_type: c.collection_type,
                collection_date: c.collection_date,
                visible: c.visible,
                cover_image_id: c.cover_image_id.clone(),
                block_count: c.blocks.len() as u32,
            })
            .collect())
    }

    async fn collection(&self, slug: &str) -> Result<Collection, ApiError> {
        self.collections
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.slug == slug)
            .cloned()
            .ok_or_else(|| not_found("collection"))
    }

    async fn update_collection(
        &self,
        id: i64,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError> {
        let update = update.clone();
        self.with_collection(id, move |c| {
            if let Some(title) = update.title {
                c.title = title;
            }
            if let Some(slug) = update.slug {
                c.slug = slug;
            }
            if let Some(kind) = update.collection_type {
                c.collection_type = kind;
            }
            if let Some(visible) = update.visible {
                c.visible = visible;
            }
            c.description = update.description.or(c.description.take());
            c.location = update.location.or(c.location.take());
            c.collection_date = update.collection_date.or(c.collection_date);
            Ok(c.clone())
        })
    }

    async fn reorder_blocks(&self, id: i64, order: &[BlockOrder]) -> Result<Collection, ApiError> {
        self.with_collection(id, |c| {
            for entry in order {
                let block = c
                    .blocks
                    .iter_mut()
                    .find(|b| b.id == entry.id)
                    .ok_or_else(|| not_found("block"))?;
                block.order_index = entry.order_index;
            }
            c.blocks.sort_by_key(|b| b.order_index);
            Ok(c.clone())
        })
    }

    async fn update_block(
        &self,
        collection_id: i64,
        block_id: &BlockId,
        update: &BlockUpdate,
    ) -> Result<ContentBlock, ApiError> {
        self.with_collection(collection_id, |c| {
            let block = c
                .blocks
                .iter_mut()
                .find(|b| &b.id == block_id)
                .ok_or_else(|| not_found("block"))?;
            if let BlockKind::Image(image) = &mut block.kind {
                image.title = update.title.clone().or(image.title.take());
                image.caption = update.caption.clone().or(image.caption.take());
                image.alt = update.alt.clone().or(image.alt.take());
            }
            if update.rating.is_some() {
                block.rating = update.rating;
            }
            Ok(block.clone())
        })
    }

    async fn delete_block(&self, collection_id: i64, block_id: &BlockId) -> Result<(), ApiError> {
        self.with_collection(collection_id, |c| {
            let before = c.blocks.len();
            c.blocks.retain(|b| &b.id != block_id);
            if c.blocks.len() == before {
                return Err(not_found("block"));
            }
            Ok(())
        })
    }
}
