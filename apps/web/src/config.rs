use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the content backend, without a trailing slash.
    pub backend_api_url: String,
    pub port: u16,
    pub rust_log: String,
    pub proxy_timeout_secs: u64,
    pub proxy_max_body_bytes: usize,
    pub scroll_store_capacity: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_api_url: require_env("BACKEND_API_URL")?
                .trim_end_matches('/')
                .to_string(),
            port: parse_env("PORT", 3000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            proxy_timeout_secs: parse_env("PROXY_TIMEOUT_SECS", 30)?,
            proxy_max_body_bytes: parse_env("PROXY_MAX_BODY_BYTES", 10 * 1024 * 1024)?,
            scroll_store_capacity: parse_env("SCROLL_STORE_CAPACITY", 1024)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
