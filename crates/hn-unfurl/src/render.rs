//! HTML metadata documents for automated clients.
//!
//! Rendering uses [maud](https://maud.lambda.xyz/). Dynamic values are
//! spliced through [`Escaped`], which also escapes single quotes (maud's
//! own escaping leaves `'` untouched).

use maud::{DOCTYPE, Markup, Render, html};

use crate::item::Item;
use crate::preview_image::PreviewImage;

/// `og:type` for every preview document.
pub const OG_TYPE: &str = "article";

/// `twitter:card` variant when a preview image is available.
pub const CARD_LARGE_IMAGE: &str = "summary_large_image";

/// `twitter:card` variant without an image.
pub const CARD_SUMMARY: &str = "summary";

/// Escape the five HTML-reserved characters.
///
/// `&` is replaced first so the other replacements are not escaped twice.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// A string spliced into markup through [`escape_html`].
pub struct Escaped<'a>(pub &'a str);

impl Render for Escaped<'_> {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&escape_html(self.0));
    }
}

/// Open Graph metadata for a document.
pub struct OpenGraphData<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub canonical_url: &'a str,
    pub site_name: &'a str,
    pub image: Option<&'a str>,
}

impl OpenGraphData<'_> {
    /// Large-image card iff an image is present.
    pub fn card_variant(&self) -> &'static str {
        if self.image.is_some() {
            CARD_LARGE_IMAGE
        } else {
            CARD_SUMMARY
        }
    }
}

/// Document title for an item: its title, or `Item #<id>`.
pub fn document_title(item: &Item) -> String {
    item.title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("Item #{}", item.id))
}

/// Render the metadata document for an item.
pub fn render_document(
    item: &Item,
    description: &str,
    canonical_url: &str,
    image: Option<&PreviewImage>,
    site_name: &str,
) -> Markup {
    let title = document_title(item);
    let og = OpenGraphData {
        title: &title,
        description,
        canonical_url,
        site_name,
        image: image.map(PreviewImage::as_str),
    };

    page_shell(&og)
}

fn page_shell(og: &OpenGraphData<'_>) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (Escaped(og.title)) }
                meta name="description" content=(Escaped(og.description));
                meta name="robots" content="noindex";
                link rel="canonical" href=(Escaped(og.canonical_url));

                // Open Graph
                meta property="og:title" content=(Escaped(og.title));
                meta property="og:description" content=(Escaped(og.description));
                meta property="og:url" content=(Escaped(og.canonical_url));
                meta property="og:site_name" content=(Escaped(og.site_name));
                meta property="og:type" content=(OG_TYPE);
                @if let Some(image) = og.image {
                    meta property="og:image" content=(Escaped(image));
                }

                // Twitter Card
                meta name="twitter:card" content=(og.card_variant());
                meta name="twitter:title" content=(Escaped(og.title));
                meta name="twitter:description" content=(Escaped(og.description));
                @if let Some(image) = og.image {
                    meta name="twitter:image" content=(Escaped(image));
                }
            }
            body {
                h1 {
                    a href=(Escaped(og.canonical_url)) { (Escaped(og.title)) }
                }
                @if !og.description.is_empty() {
                    p { (Escaped(og.description)) }
                }
            }
        }
    }
}
