//! Best-effort `og:image` discovery for an item's external link.
//!
//! The linked page is fetched once under a hard deadline, and its markup is
//! scanned with a pattern rather than parsed. Every failure yields `None`.

use std::sync::LazyLock;
use std::time::Duration;

use reqwest::header;
use regex::Regex;
use url::Url;

use crate::error::FetchError;

/// Upper bound on how much of a linked page is read.
const MAX_PAGE_BYTES: usize = 1024 * 1024;

/// Redirect hops followed before giving up.
const MAX_REDIRECTS: usize = 10;

/// `<meta property="og:image" content="...">`
static OG_IMAGE_PROPERTY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta\s[^>]*?\b(?:property|name)\s*=\s*["']og:image["'][^>]*?\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#,
    )
    .expect("valid og:image regex")
});

/// `<meta content="..." property="og:image">`
static OG_IMAGE_CONTENT_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<meta\s[^>]*?\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*?\b(?:property|name)\s*=\s*["']og:image["']"#,
    )
    .expect("valid og:image regex")
});

/// An absolute `http(s)` image URL advertised by a linked page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewImage(String);

impl PreviewImage {
    /// Parse an absolute `http(s)` URL.
    pub fn parse(url: &str) -> Option<Self> {
        Url::parse(url).ok().and_then(Self::from_url)
    }

    fn from_url(url: Url) -> Option<Self> {
        matches!(url.scheme(), "http" | "https").then(|| Self(url.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fetches linked pages and extracts their preview image.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    client: reqwest::Client,
    timeout: Duration,
}

impl ImageResolver {
    /// Build a resolver that identifies itself as `user_agent` and gives up
    /// after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client, timeout })
    }

    /// Resolve the preview image for `page_url`.
    ///
    /// Returns within the configured deadline; on expiry the in-flight
    /// request is dropped.
    pub async fn resolve(&self, page_url: &str) -> Option<PreviewImage> {
        let result = match tokio::time::timeout(self.timeout, self.try_resolve(page_url)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout.as_millis())),
        };

        match result {
            Ok(image) => {
                tracing::debug!(url = %page_url, image = %image.as_str(), "preview image resolved");
                Some(image)
            }
            Err(err) => {
                tracing::debug!(url = %page_url, error = %err, "no preview image");
                None
            }
        }
    }

    async fn try_resolve(&self, page_url: &str) -> Result<PreviewImage, FetchError> {
        let mut resp = self.client.get(page_url).send().await?;

        if !resp.status().is_success() {
            return Err(FetchError::Status(resp.status()));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase);
        if !content_type.as_deref().is_some_and(|ct| ct.contains("html")) {
            return Err(FetchError::NotHtml(content_type));
        }

        // Relative image URLs resolve against the page we landed on.
        let base = resp.url().clone();

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            let room = MAX_PAGE_BYTES - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= MAX_PAGE_BYTES {
                break;
            }
        }
        let page = String::from_utf8_lossy(&body);

        let raw = extract_og_image(&page).ok_or(FetchError::Missing("og:image declaration"))?;
        absolutize(&base, &raw).ok_or(FetchError::Missing("usable og:image url"))
    }
}

/// Find the first `og:image` declaration in a page, in either attribute order.
pub fn extract_og_image(page: &str) -> Option<String> {
    let captured = |re: &Regex| {
        re.captures(page).and_then(|caps| {
            let start = caps.get(0)?.start();
            let value = caps.get(1).or_else(|| caps.get(2))?.as_str();
            Some((start, value))
        })
    };

    let first = match (
        captured(&*OG_IMAGE_PROPERTY_FIRST),
        captured(&*OG_IMAGE_CONTENT_FIRST),
    ) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    };

    first
        .map(|(_, value)| decode_entities(value.trim()))
        .filter(|value| !value.is_empty())
}

/// Decode the entities that commonly appear inside attribute values.
fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn absolutize(base: &Url, raw: &str) -> Option<PreviewImage> {
    base.join(raw).ok().and_then(PreviewImage::from_url)
}
