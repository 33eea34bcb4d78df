use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;
use crate::content::client::CollectionSource;
use crate::layout::LayoutConfig;
use crate::scroll::ScrollStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Backend content API. Default: `ContentApi`; tests swap in an in-memory source.
    pub content: Arc<dyn CollectionSource>,
    /// HTTP client used by the reverse proxy (no retries, streaming bodies).
    pub http: Client,
    /// Row layout constants, fixed for the life of the process.
    pub layout: LayoutConfig,
    pub scroll: ScrollStore,
}
