//! Content API client, the single point of entry for backend REST calls.
//!
//! Reads go to `/api/read/...` and are retried on 429, 5xx and transport
//! errors with exponential backoff. Writes go to `/api/write/...` and are
//! sent exactly once; a failed write is reported to the editor, not replayed.
//!
//! Handlers depend on the `CollectionSource` trait, carried in `AppState` as
//! `Arc<dyn CollectionSource>`, so tests can swap in an in-memory source.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::block::{BlockId, ContentBlock};
use crate::models::collection::{
    BlockOrder, BlockUpdate, Collection, CollectionSummary, CollectionType, CollectionUpdate,
};

const MAX_ATTEMPTS: u32 = 3;
const BASE_BACKOFF_MS: u64 = 250;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Deserialize)]
struct BackendError {
    message: String,
}

/// Read and write access to collections.
#[async_trait]
pub trait CollectionSource: Send + Sync {
    async fn list_collections(
        &self,
        kind: Option<CollectionType>,
    ) -> Result<Vec<CollectionSummary>, ApiError>;

    async fn collection(&self, slug: &str) -> Result<Collection, ApiError>;

    async fn update_collection(
        &self,
        id: i64,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError>;

    async fn reorder_blocks(&self, id: i64, order: &[BlockOrder]) -> Result<Collection, ApiError>;

    async fn update_block(
        &self,
        collection_id: i64,
        block_id: &BlockId,
        update: &BlockUpdate,
    ) -> Result<ContentBlock, ApiError>;

    async fn delete_block(&self, collection_id: i64, block_id: &BlockId) -> Result<(), ApiError>;
}

/// `CollectionSource` backed by the portfolio REST API.
#[derive(Clone)]
pub struct ContentApi {
    client: Client,
    base_url: Url,
}

impl ContentApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url,
        })
    }

    /// `{base}/api/{segments...}` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    /// GET with retries on 429 / 5xx / transport failure. After the last
    /// attempt the error from that attempt is returned.
    async fn read<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let mut attempt = 1;
        loop {
            let error = match self.client.get(url.clone()).query(query).send().await {
                Err(e) => ApiError::Http(e),
                Ok(response) => {
                    let status = response.status();
                    if status.as_u16() != 429 && !status.is_server_error() {
                        let response = ensure_success(response).await?;
                        let bytes = response.bytes().await?;
                        debug!(url = %url, bytes = bytes.len(), "Backend read succeeded");
                        return Ok(serde_json::from_slice(&bytes)?);
                    }
                    let body = response.text().await.unwrap_or_default();
                    ApiError::Api {
                        status: status.as_u16(),
                        message: error_message(body),
                    }
                }
            };

            if attempt >= MAX_ATTEMPTS {
                return Err(error);
            }

            let delay = Duration::from_millis(BASE_BACKOFF_MS * (1 << (attempt - 1)));
            warn!(
                url = %url,
                attempt,
                error = %error,
                "Backend read failed, retrying after {}ms",
                delay.as_millis()
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    /// Single-shot write. Returns the raw response for the caller to decode.
    async fn write(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        ensure_success(response).await
    }

    async fn write_json<B, T>(&self, method: Method, url: Url, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .write(self.client.request(method, url).json(body))
            .await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CollectionSource for ContentApi {
    async fn list_collections(
        &self,
        kind: Option<CollectionType>,
    ) -> Result<Vec<CollectionSummary>, ApiError> {
        let url = self.endpoint(&["read", "collections"])?;
        match kind {
            Some(kind) => self.read(url, &[("type", kind.as_str())]).await,
            None => self.read(url, &[]).await,
        }
    }

    async fn collection(&self, slug: &str) -> Result<Collection, ApiError> {
        let url = self.endpoint(&["read", "collections", slug])?;
        self.read(url, &[]).await
    }

    async fn update_collection(
        &self,
        id: i64,
        update: &CollectionUpdate,
    ) -> Result<Collection, ApiError> {
        let url = self.endpoint(&["write", "collections", &id.to_string()])?;
        self.write_json(Method::PUT, url, update).await
    }

    async fn reorder_blocks(&self, id: i64, order: &[BlockOrder]) -> Result<Collection, ApiError> {
        let url = self.endpoint(&["write", "collections", &id.to_string(), "reorder"])?;
        self.write_json(Method::PUT, url, order).await
    }

    async fn update_block(
        &self,
        collection_id: i64,
        block_id: &BlockId,
        update: &BlockUpdate,
    ) -> Result<ContentBlock, ApiError> {
        let url = self.endpoint(&[
            "write",
            "collections",
            &collection_id.to_string(),
            "blocks",
            &block_id.to_string(),
        ])?;
        self.write_json(Method::PATCH, url, update).await
    }

    async fn delete_block(&self, collection_id: i64, block_id: &BlockId) -> Result<(), ApiError> {
        let url = self.endpoint(&[
            "write",
            "collections",
            &collection_id.to_string(),
            "blocks",
            &block_id.to_string(),
        ])?;
        self.write(self.client.delete(url)).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into `ApiError::Api`.
async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Api {
        status: status.as_u16(),
        message: error_message(body),
    })
}

/// Prefers the backend's `{"message": ...}` envelope, falls back to the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<BackendError>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}
