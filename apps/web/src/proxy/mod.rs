//! Reverse proxy from `/api/proxy/*path` to `{BACKEND_API_URL}/api/*path`.
//!
//! Lets the browser reach the content backend same-origin. Request headers
//! are scrubbed of hop-by-hop and hosting-platform headers before
//! forwarding; the response status and body are passed through untouched,
//! with the body streamed rather than buffered.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{
        header::{self, HeaderMap, HeaderName, HeaderValue},
        Uri,
    },
    response::Response,
};
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

pub const PROXY_PREFIX: &str = "/api/proxy";

/// RFC 9110 §7.6.1 connection-specific headers.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Headers injected by the hosting edge that the backend must not see.
const PLATFORM_PREFIXES: [&str; 4] = ["x-vercel-", "x-middleware-", "x-forwarded-", "cf-"];
const PLATFORM_EXACT: [&str; 2] = ["x-real-ip", "forwarded"];

// ────────────────────────────────────────────────────────────────────────────
// Handler
// ────────────────────────────────────────────────────────────────────────────

/// ANY /api/proxy/*path
pub async fn handle_proxy(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let target = upstream_url(&state.config.backend_api_url, &parts.uri)?;

    let limit = state.config.proxy_max_body_bytes;
    if declared_length(&parts.headers).is_some_and(|len| len > limit) {
        return Err(too_large(limit));
    }
    let body = to_bytes(body, limit).await.map_err(|_| too_large(limit))?;

    let headers = forwarded_request_headers(&parts.headers);
    debug!(method = %parts.method, target = %target, bytes = body.len(), "Proxying request");

    let upstream = state
        .http
        .request(parts.method.clone(), &target)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|e| {
            warn!(method = %parts.method, target = %target, error = %e, "Proxy request failed");
            AppError::Upstream(format!("{} {target}: {e}", parts.method))
        })?;

    let status = upstream.status();
    let headers = forwarded_response_headers(upstream.headers());
    debug!(target = %target, status = status.as_u16(), "Proxy response");

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn too_large(limit: usize) -> AppError {
    AppError::PayloadTooLarge(format!("Request body exceeds {limit} bytes"))
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

// ────────────────────────────────────────────────────────────────────────────
// URL rewriting
// ────────────────────────────────────────────────────────────────────────────

/// Maps `/api/proxy/{rest}?{query}` onto `{backend}/api/{rest}?{query}`,
/// keeping the path exactly as the client encoded it.
pub fn upstream_url(backend: &str, uri: &Uri) -> Result<String, AppError> {
    let rest = uri
        .path()
        .strip_prefix(PROXY_PREFIX)
        .filter(|rest| rest.starts_with('/'))
        .ok_or_else(|| AppError::NotFound(format!("No proxy route for {}", uri.path())))?;

    if rest.split('/').any(is_parent_segment) {
        return Err(AppError::Validation(
            "Proxy path must not contain '..' segments".to_string(),
        ));
    }

    let backend = backend.trim_end_matches('/');
    Ok(match uri.query() {
        Some(query) => format!("{backend}/api{rest}?{query}"),
        None => format!("{backend}/api{rest}"),
    })
}

fn is_parent_segment(segment: &str) -> bool {
    segment.to_ascii_lowercase().replace("%2e", ".") == ".."
}

// ────────────────────────────────────────────────────────────────────────────
// Header filtering
// ────────────────────────────────────────────────────────────────────────────

/// Headers to send upstream: everything except hop-by-hop, `host`,
/// `content-length` and platform headers. Defaults `Accept` to JSON.
pub fn forwarded_request_headers(incoming: &HeaderMap) -> HeaderMap {
    let connection = connection_tokens(incoming);
    let mut headers = HeaderMap::with_capacity(incoming.len());

    for (name, value) in incoming {
        if is_hop_by_hop(name, &connection)
            || *name == header::HOST
            || *name == header::CONTENT_LENGTH
            || is_platform_header(name)
        {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    if !headers.contains_key(header::ACCEPT) {
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    }
    headers
}

/// Headers to return to the client: everything except hop-by-hop.
pub fn forwarded_response_headers(upstream: &HeaderMap) -> HeaderMap {
    let connection = connection_tokens(upstream);
    let mut headers = HeaderMap::with_capacity(upstream.len());
    for (name, value) in upstream {
        if !is_hop_by_hop(name, &connection) {
            headers.append(name.clone(), value.clone());
        }
    }
    headers
}

/// Header names listed in `Connection`, lowercased.
fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn is_hop_by_hop(name: &HeaderName, connection: &[String]) -> bool {
    let name = name.as_str();
    HOP_BY_HOP.contains(&name) || connection.iter().any(|token| token == name)
}

fn is_platform_header(name: &HeaderName) -> bool {
    let name = name.as_str();
    PLATFORM_EXACT.contains(&name) || PLATFORM_PREFIXES.iter().any(|p| name.starts_with(p))
}
