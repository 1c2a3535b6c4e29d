//! hn-unfurl - link previews for Hacker News items.
//!
//! This crate provides a small HTTP server that sits in front of
//! `news.ycombinator.com/item?id=...` links. Link-unfurling bots (Slack,
//! Discord, Twitter, curl, ...) receive an HTML document carrying Open Graph
//! and Twitter Card metadata; browsers are redirected to the real page.
//!
//! # Pipeline
//!
//! - **Classify**: `User-Agent` substring match decides bot vs browser
//! - **Fetch**: one lookup against the HN Firebase item API
//! - **Enrich**: best-effort `og:image` scrape of the story's link, under a
//!   hard deadline
//! - **Render**: maud template with every dynamic value escaped
//!
//! Any upstream failure degrades to a redirect or to a card without an image.
//! Nothing is stored between requests.
//!
//! # URL Pattern
//!
//! ```text
//! GET /item?id={digits}
//! ```

pub mod classify;
pub mod config;
pub mod describe;
pub mod error;
pub mod item;
pub mod preview_image;
pub mod render;
pub mod routes;
pub mod state;
pub mod unfurl;

pub use config::Config;
pub use routes::router;
pub use state::AppState;
