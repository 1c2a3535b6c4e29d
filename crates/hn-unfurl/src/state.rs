//! Application state shared across all request handlers.
//!
//! Everything here is immutable after startup; clones are cheap handles.

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;

use crate::classify::CallerClassifier;
use crate::config::Config;
use crate::preview_image::ImageResolver;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<Config>,

    /// Client for the upstream item API.
    pub api: reqwest::Client,

    /// Linked-page fetcher for preview images.
    pub images: ImageResolver,

    /// Compiled automated-agent matcher.
    pub classifier: Arc<CallerClassifier>,
}

impl AppState {
    /// Create a new application state from configuration.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        // Canonical links become `Location` headers; reject bases that can't.
        HeaderValue::from_str(&config.canonical_link("1"))
            .with_context(|| format!("invalid site base url: {}", config.site_base_url))?;

        let api = reqwest::Client::builder()
            .user_agent(config.fetch_user_agent.as_str())
            .build()
            .context("failed to build item API client")?;

        let images = ImageResolver::new(&config.fetch_user_agent, config.image_timeout)
            .context("failed to build preview image client")?;

        let classifier = CallerClassifier::new(config.bot_patterns.iter())
            .context("failed to compile bot patterns")?;

        tracing::info!(
            bot_patterns = config.bot_patterns.len(),
            image_timeout_ms = config.image_timeout.as_millis() as u64,
            "application state initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            api,
            images,
            classifier: Arc::new(classifier),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_from_default_config() {
        let state = AppState::new(Config::default()).unwrap();
        assert_eq!(state.config.site_name, "Hacker News");
    }

    #[test]
    fn state_rejects_unrepresentable_site_base() {
        let config = Config {
            site_base_url: "https://news.ycombinator.com\n".to_string(),
            ..Default::default()
        };
        assert!(AppState::new(config).is_err());
    }
}
