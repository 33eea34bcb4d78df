mod admin;
mod config;
mod content;
mod errors;
mod layout;
mod models;
mod proxy;
mod routes;
mod scroll;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::client::ContentApi;
use crate::layout::default_layout_config;
use crate::routes::build_router;
use crate::scroll::ScrollStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio web v{}", env!("CARGO_PKG_VERSION"));

    let timeout = Duration::from_secs(config.proxy_timeout_secs);

    // Content backend client (retrying reads, single-shot writes)
    let content = Arc::new(ContentApi::new(&config.backend_api_url, timeout)?);
    info!("Content API client initialized ({})", config.backend_api_url);

    // Proxy client: no retries, bodies streamed through
    let http = reqwest::Client::builder().timeout(timeout).build()?;

    let layout = default_layout_config();
    info!(
        "Layout config: {} desktop / {} mobile slots, breakpoint {}px",
        layout.desktop_slot_width, layout.mobile_slot_width, layout.mobile_breakpoint
    );

    let scroll = ScrollStore::new(config.scroll_store_capacity);

    // Build app state
    let state = AppState {
        config: config.clone(),
        content,
        http,
        layout,
        scroll,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the admin UI has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
