//! Liveness endpoint reporting which upstreams this instance talks to.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// `GET /health` body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Item API base the fetcher calls.
    api_base_url: String,
    /// Origin that redirects and canonical links point at.
    site_base_url: String,
    /// Deadline for the whole preview image lookup.
    image_timeout_ms: u128,
    /// Number of automated-client patterns in effect.
    bot_patterns: usize,
}

/// Report liveness and the upstream configuration.
///
/// Makes no upstream calls.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = &state.config;
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        api_base_url: config.api_base_url.clone(),
        site_base_url: config.site_base_url.clone(),
        image_timeout_ms: config.image_timeout.as_millis(),
        bot_patterns: config.bot_patterns.len(),
    })
}
