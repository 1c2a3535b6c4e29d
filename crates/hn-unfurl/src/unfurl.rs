//! The preview pipeline for a single request.
//!
//! validate → classify → fetch item → resolve image → describe → render.
//! Upstream failures never surface as errors: a missing item becomes a
//! redirect and a missing image becomes a summary card.

use crate::classify::Classification;
use crate::describe::describe;
use crate::error::UnfurlError;
use crate::item::{ItemLookup, fetch_item};
use crate::render::render_document;
use crate::state::AppState;

/// What to send back for an item request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 302 to the canonical origin link.
    Redirect(String),
    /// 200 with a rendered metadata document.
    Document(String),
}

/// Whether `raw` is a non-empty run of ASCII digits.
pub fn is_item_id(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Run the preview pipeline for `id` on behalf of a caller identified by
/// `user_agent`.
pub async fn unfurl(
    state: &AppState,
    id: Option<&str>,
    user_agent: Option<&str>,
) -> Result<Outcome, UnfurlError> {
    let raw_id = id.ok_or_else(|| UnfurlError::BadRequest("missing id".to_string()))?;
    if !is_item_id(raw_id) {
        return Err(UnfurlError::BadRequest(format!("invalid id {raw_id:?}")));
    }

    let canonical = state.config.canonical_link(raw_id);

    if state.classifier.classify(user_agent) == Classification::Interactive {
        tracing::debug!(id = %raw_id, "interactive caller, redirecting");
        return Ok(Outcome::Redirect(canonical));
    }

    let item = match fetch_item(&state.api, &state.config.api_base_url, raw_id).await {
        ItemLookup::Found(item) => item,
        ItemLookup::NotFound => {
            tracing::debug!(id = %raw_id, "item unavailable, redirecting");
            return Ok(Outcome::Redirect(canonical));
        }
    };

    let image = match item.url.as_deref() {
        Some(link) => state.images.resolve(link).await,
        None => None,
    };

    let description = describe(&item, chrono::Utc::now().timestamp());
    let markup = render_document(
        &item,
        &description,
        &canonical,
        image.as_ref(),
        &state.config.site_name,
    );

    tracing::info!(
        id = %raw_id,
        has_image = image.is_some(),
        "rendered preview document"
    );

    Ok(Outcome::Document(markup.into_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn item_id_validation() {
        assert!(is_item_id("12345"));
        assert!(is_item_id("0"));
        assert!(!is_item_id(""));
        assert!(!is_item_id("abc"));
        assert!(!is_item_id("12a"));
        assert!(!is_item_id("-1"));
        assert!(!is_item_id("+1"));
        assert!(!is_item_id(" 1"));
        assert!(!is_item_id("１２"));
    }

    fn offline_state() -> AppState {
        // Unroutable upstream: any network call would fail the assertions below.
        AppState::new(Config {
            api_base_url: "http://127.0.0.1:9/v0".to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn missing_id_is_bad_request() {
        let err = unfurl(&offline_state(), None, None).await.unwrap_err();
        assert!(matches!(err, UnfurlError::BadRequest(_)));
    }

    #[tokio::test]
    async fn overflowing_id_redirects_every_caller() {
        let id = "99999999999999999999999";
        let expected = Outcome::Redirect(format!("https://news.ycombinator.com/item?id={id}"));

        let browser = unfurl(
            &offline_state(),
            Some(id),
            Some("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"),
        )
        .await
        .unwrap();
        assert_eq!(browser, expected);

        let bot = unfurl(&offline_state(), Some(id), Some("Slackbot")).await.unwrap();
        assert_eq!(bot, expected);
    }

    #[tokio::test]
    async fn interactive_caller_is_redirected() {
        let outcome = unfurl(
            &offline_state(),
            Some("12345"),
            Some("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"),
        )
        .await
        .unwrap();
        assert_eq!(
            outcome,
            Outcome::Redirect("https://news.ycombinator.com/item?id=12345".to_string())
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_redirects_bots() {
        let outcome = unfurl(&offline_state(), Some("12345"), Some("Slackbot"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::Redirect("https://news.ycombinator.com/item?id=12345".to_string())
        );
    }
}
