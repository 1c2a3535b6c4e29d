//! Usage banner served at `/`.

use axum::response::IntoResponse;

const USAGE: &str = "\
hn-unfurl: link previews for Hacker News items

  GET /item?id=<digits>

Link-preview bots receive an HTML document with Open Graph and Twitter Card
metadata. Everyone else is redirected to the item on Hacker News.
";

/// Render the usage banner.
pub async fn usage() -> impl IntoResponse {
    ([("content-type", "text/plain; charset=utf-8")], USAGE)
}
