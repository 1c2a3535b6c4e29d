//! Route definitions for the unfurl service.
//!
//! ## Routes
//!
//! - `GET /` - Plain-text usage banner
//! - `GET /health` - Health check (JSON)
//! - `GET /robots.txt` - Crawler instructions
//! - `GET /item?id={digits}` - Preview document or redirect
//!
//! Every other path is a 404.

mod health;
mod home;
mod item;

use axum::Router;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::routing::get;

use crate::error::UnfurlError;
use crate::state::AppState;

/// Build the complete unfurl service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home::usage))
        .route("/health", get(health::health_check))
        .route("/robots.txt", get(robots_txt))
        .route("/item", get(item::item_handler))
        .fallback(not_found)
        .with_state(state)
}

/// Serve robots.txt allowing all crawlers.
///
/// Unfurl bots must be able to fetch `/item`.
async fn robots_txt() -> impl IntoResponse {
    (
        [("content-type", "text/plain; charset=utf-8")],
        "User-agent: *\nAllow: /\n",
    )
}

async fn not_found(uri: Uri) -> UnfurlError {
    UnfurlError::NotFound(uri.path().to_string())
}
