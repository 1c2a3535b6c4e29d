//! Error types for the unfurl service.
//!
//! Client errors are rendered as small HTML pages. Upstream failures never
//! reach the caller: they are collapsed into a redirect or a missing image.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::{DOCTYPE, html};

/// Errors surfaced to the caller.
#[derive(Debug, thiserror::Error)]
pub enum UnfurlError {
    /// Missing or malformed request input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested path is not served.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Why an upstream fetch produced nothing.
///
/// Only logged; every variant degrades to "absent" at the fetcher boundary.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS, redirect or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream status {0}")]
    Status(reqwest::StatusCode),

    /// Response body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response was not an HTML document.
    #[error("unsupported content type: {0:?}")]
    NotHtml(Option<String>),

    /// The call exceeded its deadline and was cancelled.
    #[error("timed out after {0} ms")]
    Timeout(u128),

    /// The response was fine but carried nothing usable.
    #[error("missing: {0}")]
    Missing(&'static str),
}

impl IntoResponse for UnfurlError {
    fn into_response(self) -> Response {
        let (status, title, message) = match &self {
            Self::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                format!("Expected a numeric item id, e.g. /item?id=8863. {msg}"),
            ),
            Self::NotFound(path) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("Nothing is served at {path}."),
            ),
        };

        tracing::debug!(status = status.as_u16(), error = %self, "client error");

        let markup = html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1";
                    meta name="robots" content="noindex";
                    title { (title) }
                }
                body {
                    h1 { (title) }
                    p { (message) }
                }
            }
        };

        (status, markup).into_response()
    }
}
