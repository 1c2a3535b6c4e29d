//! Application configuration loaded from environment variables.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

/// Substrings that identify link-unfurling agents and generic HTTP tooling.
///
/// Matched case-insensitively against the `User-Agent` header.
pub const DEFAULT_BOT_PATTERNS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "fetcher",
    "preview",
    "facebookexternalhit",
    "twitterbot",
    "slackbot",
    "discordbot",
    "telegrambot",
    "whatsapp",
    "linkedinbot",
    "skypeuripreview",
    "embedly",
    "mastodon",
    "bluesky",
    "iframely",
    "redditbot",
    "applebot",
    "pinterest",
    "curl",
    "wget",
    "python-requests",
    "go-http-client",
    "okhttp",
    "axios",
    "node-fetch",
];

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080").
    pub bind_addr: String,

    /// Base URL of the upstream item API, without trailing slash.
    pub api_base_url: String,

    /// Base URL of the origin site. Canonical links are
    /// `{site_base_url}/item?id={id}`.
    pub site_base_url: String,

    /// Site name shown in `og:site_name`.
    pub site_name: String,

    /// Hard deadline for the preview image page fetch.
    pub image_timeout: Duration,

    /// `User-Agent` sent when fetching linked pages.
    pub fetch_user_agent: String,

    /// `max-age` for rendered preview documents, in seconds.
    pub cache_max_age: u32,

    /// Lowercased substrings that classify a caller as automated.
    pub bot_patterns: Arc<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            api_base_url: "https://hacker-news.firebaseio.com/v0".to_string(),
            site_base_url: "https://news.ycombinator.com".to_string(),
            site_name: "Hacker News".to_string(),
            image_timeout: Duration::from_millis(3000),
            fetch_user_agent: format!(
                "hn-unfurl/{} (+link preview fetcher)",
                env!("CARGO_PKG_VERSION")
            ),
            cache_max_age: 300,
            bot_patterns: Arc::new(
                DEFAULT_BOT_PATTERNS
                    .iter()
                    .map(|p| (*p).to_string())
                    .collect(),
            ),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `UNFURL_BIND_ADDR`: Server bind address (default: "0.0.0.0:8080")
    /// - `HN_API_BASE_URL`: Item API base (default: "https://hacker-news.firebaseio.com/v0")
    /// - `HN_SITE_BASE_URL`: Origin site base (default: "https://news.ycombinator.com")
    /// - `UNFURL_SITE_NAME`: Site name (default: "Hacker News")
    /// - `UNFURL_IMAGE_TIMEOUT_MS`: Image fetch deadline in ms (default: 3000)
    /// - `UNFURL_FETCH_USER_AGENT`: User-Agent for linked page fetches
    /// - `UNFURL_CACHE_MAX_AGE`: Document `max-age` in seconds (default: 300)
    /// - `UNFURL_EXTRA_BOT_PATTERNS`: Comma-separated extra automated-agent substrings
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = std::env::var("UNFURL_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let api_base_url = std::env::var("HN_API_BASE_URL")
            .unwrap_or(defaults.api_base_url)
            .trim_end_matches('/')
            .to_string();

        let site_base_url = std::env::var("HN_SITE_BASE_URL")
            .unwrap_or(defaults.site_base_url)
            .trim_end_matches('/')
            .to_string();

        let site_name = std::env::var("UNFURL_SITE_NAME").unwrap_or(defaults.site_name);

        let image_timeout = match std::env::var("UNFURL_IMAGE_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(
                raw.trim()
                    .parse()
                    .with_context(|| format!("invalid UNFURL_IMAGE_TIMEOUT_MS: {raw:?}"))?,
            ),
            Err(_) => defaults.image_timeout,
        };

        let fetch_user_agent =
            std::env::var("UNFURL_FETCH_USER_AGENT").unwrap_or(defaults.fetch_user_agent);

        let cache_max_age = match std::env::var("UNFURL_CACHE_MAX_AGE") {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("invalid UNFURL_CACHE_MAX_AGE: {raw:?}"))?,
            Err(_) => defaults.cache_max_age,
        };

        let mut bot_patterns: Vec<String> = defaults.bot_patterns.as_ref().clone();
        bot_patterns.extend(
            std::env::var("UNFURL_EXTRA_BOT_PATTERNS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        );

        tracing::info!(
            bind_addr = %bind_addr,
            api_base_url = %api_base_url,
            site_base_url = %site_base_url,
            image_timeout_ms = image_timeout.as_millis() as u64,
            cache_max_age,
            bot_pattern_count = bot_patterns.len(),
            "unfurl configuration loaded"
        );

        Ok(Self {
            bind_addr,
            api_base_url,
            site_base_url,
            site_name,
            image_timeout,
            fetch_user_agent,
            cache_max_age,
            bot_patterns: Arc::new(bot_patterns),
        })
    }

    /// Canonical origin link for an item id.
    ///
    /// `id` is used verbatim so the link matches the origin's own URLs.
    pub fn canonical_link(&self, id: &str) -> String {
        format!("{}/item?id={id}", self.site_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mutex to serialize config tests that manipulate env vars.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_KEYS: &[&str] = &[
        "UNFURL_BIND_ADDR",
        "HN_API_BASE_URL",
        "HN_SITE_BASE_URL",
        "UNFURL_SITE_NAME",
        "UNFURL_IMAGE_TIMEOUT_MS",
        "UNFURL_FETCH_USER_AGENT",
        "UNFURL_CACHE_MAX_AGE",
        "UNFURL_EXTRA_BOT_PATTERNS",
    ];

    /// Helper to run config tests with isolated env vars.
    fn with_env_vars<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let saved: Vec<_> = ENV_KEYS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: Serialized by mutex; only test code touches these vars.
        unsafe {
            for k in ENV_KEYS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        // SAFETY: Restoring original env state.
        unsafe {
            for (k, v) in &saved {
                match v {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn config_defaults() {
        with_env_vars(&[], || {
            let config = Config::from_env().unwrap();
            assert_eq!(config.bind_addr, "0.0.0.0:8080");
            assert_eq!(config.api_base_url, "https://hacker-news.firebaseio.com/v0");
            assert_eq!(config.site_base_url, "https://news.ycombinator.com");
            assert_eq!(config.site_name, "Hacker News");
            assert_eq!(config.image_timeout, Duration::from_millis(3000));
            assert_eq!(config.cache_max_age, 300);
            assert_eq!(config.bot_patterns.len(), DEFAULT_BOT_PATTERNS.len());
            assert!(config.fetch_user_agent.starts_with("hn-unfurl/"));
        });
    }

    #[test]
    fn config_custom_values() {
        with_env_vars(
            &[
                ("UNFURL_BIND_ADDR", "127.0.0.1:9090"),
                ("HN_API_BASE_URL", "http://api.local/v0/"),
                ("HN_SITE_BASE_URL", "http://site.local/"),
                ("UNFURL_SITE_NAME", "Lobsters"),
                ("UNFURL_IMAGE_TIMEOUT_MS", "1500"),
                ("UNFURL_FETCH_USER_AGENT", "test-agent"),
                ("UNFURL_CACHE_MAX_AGE", "60"),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bind_addr, "127.0.0.1:9090");
                assert_eq!(config.api_base_url, "http://api.local/v0");
                assert_eq!(config.site_base_url, "http://site.local");
                assert_eq!(config.site_name, "Lobsters");
                assert_eq!(config.image_timeout, Duration::from_millis(1500));
                assert_eq!(config.fetch_user_agent, "test-agent");
                assert_eq!(config.cache_max_age, 60);
            },
        );
    }

    #[test]
    fn config_invalid_timeout_is_error() {
        with_env_vars(&[("UNFURL_IMAGE_TIMEOUT_MS", "soon")], || {
            assert!(Config::from_env().is_err());
        });
    }

    #[test]
    fn config_extra_bot_patterns_appended() {
        with_env_vars(
            &[("UNFURL_EXTRA_BOT_PATTERNS", " Zulip , ,matrix-media-repo")],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.bot_patterns.len(), DEFAULT_BOT_PATTERNS.len() + 2);
                assert!(config.bot_patterns.contains(&"zulip".to_string()));
                assert!(config.bot_patterns.contains(&"matrix-media-repo".to_string()));
            },
        );
    }

    #[test]
    fn canonical_link_matches_origin_scheme() {
        let config = Config::default();
        assert_eq!(
            config.canonical_link("12345"),
            "https://news.ycombinator.com/item?id=12345"
        );
    }
}
