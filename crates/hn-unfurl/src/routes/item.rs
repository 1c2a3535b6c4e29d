//! Item preview route.
//!
//! Handles `GET /item?id={digits}`. Automated callers get a metadata
//! document; everyone else, and every caller whose item cannot be fetched,
//! gets a 302 to the origin.

use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::UnfurlError;
use crate::state::AppState;
use crate::unfurl::{Outcome, unfurl};

/// Content-Security-Policy for preview documents. They carry no scripts,
/// styles or frames.
const CSP_HEADER: &str = "default-src 'none'; img-src https: data:; form-action 'none'; frame-ancestors 'none'";

/// Query parameters for `/item`.
#[derive(Debug, Deserialize)]
pub struct ItemQuery {
    id: Option<String>,
}

/// Handle a preview request for a single item.
pub async fn item_handler(
    State(state): State<AppState>,
    Query(query): Query<ItemQuery>,
    headers: HeaderMap,
) -> Result<Response, UnfurlError> {
    // Non-ASCII bytes are replaced rather than dropping the whole header.
    let user_agent = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()));

    let outcome = unfurl(&state, query.id.as_deref(), user_agent.as_deref()).await?;

    Ok(match outcome {
        Outcome::Redirect(location) => redirect_response(&location),
        Outcome::Document(html) => document_response(html, state.config.cache_max_age),
    })
}

/// Build a 302 response to `location`.
fn redirect_response(location: &str) -> Response {
    let mut headers = HeaderMap::new();
    if let Ok(val) = HeaderValue::from_str(location) {
        headers.insert(header::LOCATION, val);
    }
    headers.insert(header::VARY, HeaderValue::from_static("user-agent"));

    (StatusCode::FOUND, headers).into_response()
}

/// Build a 200 response with the document, security headers and a
/// freshness hint.
fn document_response(html: String, max_age: u32) -> Response {
    let mut headers = HeaderMap::new();

    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );

    // Security headers
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP_HEADER),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );

    // ETag (xxHash of content)
    let hash = xxhash_rust::xxh3::xxh3_64(html.as_bytes());
    let etag = format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()));
    if let Ok(val) = HeaderValue::from_str(&etag) {
        headers.insert(header::ETAG, val);
    }

    if let Ok(val) = HeaderValue::from_str(&format!("public, max-age={max_age}")) {
        headers.insert(header::CACHE_CONTROL, val);
    }
    headers.insert(header::VARY, HeaderValue::from_static("user-agent"));

    (StatusCode::OK, headers, html).into_response()
}
