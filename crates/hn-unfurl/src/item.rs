//! Item lookups against the Hacker News Firebase API.
//!
//! `GET {api_base}/item/{id}.json` returns the item object, or the JSON
//! literal `null` for ids that do not exist. Every field is optional.

use serde::Deserialize;

use crate::error::FetchError;

/// Item kind as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    #[serde(rename = "pollopt")]
    PollOption,
    #[serde(other)]
    Unknown,
}

/// A Hacker News item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    /// Item id. Filled from the request when the payload omits it.
    #[serde(default)]
    pub id: u64,
    #[serde(default, rename = "type")]
    pub kind: Option<ItemKind>,
    #[serde(default)]
    pub title: Option<String>,
    /// HTML body of comments, Ask HN posts and jobs.
    #[serde(default)]
    pub text: Option<String>,
    /// External link for link posts.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub score: Option<u64>,
    /// Author handle.
    #[serde(default)]
    pub by: Option<String>,
    /// Creation time, Unix seconds.
    #[serde(default)]
    pub time: Option<i64>,
    /// Total comment count.
    #[serde(default)]
    pub descendants: Option<u64>,
    #[serde(default)]
    pub kids: Option<Vec<u64>>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub dead: bool,
}

/// Result of an item lookup.
#[derive(Debug)]
pub enum ItemLookup {
    Found(Item),
    NotFound,
}

/// Fetch an item by id.
///
/// Any failure (status, transport, decode, `null`, deleted or dead item)
/// is reported as [`ItemLookup::NotFound`]. `id` is the digit string from
/// the request and goes into the path unchanged.
pub async fn fetch_item(client: &reqwest::Client, api_base: &str, id: &str) -> ItemLookup {
    match try_fetch_item(client, api_base, id).await {
        Ok(item) => {
            tracing::debug!(%id, kind = ?item.kind, "item fetched");
            ItemLookup::Found(item)
        }
        Err(err) => {
            tracing::debug!(%id, error = %err, "item lookup failed");
            ItemLookup::NotFound
        }
    }
}

async fn try_fetch_item(
    client: &reqwest::Client,
    api_base: &str,
    id: &str,
) -> Result<Item, FetchError> {
    let url = format!("{api_base}/item/{id}.json");

    let resp = client.get(&url).send().await?;
    if !resp.status().is_success() {
        return Err(FetchError::Status(resp.status()));
    }

    let bytes = resp.bytes().await?;
    let mut item = serde_json::from_slice::<Option<Item>>(&bytes)?
        .ok_or(FetchError::Missing("null item"))?;

    if item.deleted || item.dead {
        return Err(FetchError::Missing("deleted or dead item"));
    }

    if item.id == 0
        && let Ok(parsed) = id.parse()
    {
        item.id = parsed;
    }

    Ok(item)
}
