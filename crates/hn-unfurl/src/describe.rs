//! One-line item summaries, e.g. `142 points | by alice | 3h ago | 87 comments | (example.com)`.

use crate::item::Item;

const SEPARATOR: &str = " | ";

/// Build the summary line for an item.
///
/// Segments whose source field is absent are skipped. A link that fails to
/// parse only drops the hostname segment.
pub fn describe(item: &Item, now: i64) -> String {
    let mut parts = Vec::with_capacity(5);

    if let Some(score) = item.score {
        parts.push(format!("{score} points"));
    }
    if let Some(by) = &item.by {
        parts.push(format!("by {by}"));
    }
    if let Some(time) = item.time {
        parts.push(format_age(now.saturating_sub(time)));
    }
    if let Some(descendants) = item.descendants {
        parts.push(format!("{descendants} comments"));
    }
    if let Some(host) = item.url.as_deref().and_then(hostname) {
        parts.push(format!("({host})"));
    }

    parts.join(SEPARATOR)
}

/// Format an age in seconds as `Ns ago`, `Nm ago`, `Nh ago` or `Nd ago`.
///
/// Floors into the largest unit below the next tier; negative ages count as 0.
pub fn format_age(secs: i64) -> String {
    let secs = secs.max(0);
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3_600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3_600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

fn hostname(link: &str) -> Option<String> {
    url::Url::parse(link)
        .ok()?
        .host_str()
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn full_description() {
        let item = Item {
            id: 1,
            score: Some(142),
            by: Some("alice".to_string()),
            time: Some(NOW - 10_800),
            descendants: Some(87),
            url: Some("https://example.com/x".to_string()),
            ..Default::default()
        };
        assert_eq!(
            describe(&item, NOW),
            "142 points | by alice | 3h ago | 87 comments | (example.com)"
        );
    }

    #[test]
    fn comment_description() {
        let item = Item {
            by: Some("bob".to_string()),
            time: Some(NOW - 45),
            ..Default::default()
        };
        assert_eq!(describe(&item, NOW), "by bob | 45s ago");
    }

    #[test]
    fn empty_item_yields_empty_description() {
        assert_eq!(describe(&Item::default(), NOW), "");
    }

    #[test]
    fn zero_counts_are_kept() {
        let item = Item {
            score: Some(0),
            descendants: Some(0),
            ..Default::default()
        };
        assert_eq!(describe(&item, NOW), "0 points | 0 comments");
    }

    #[test]
    fn malformed_url_drops_only_hostname() {
        let item = Item {
            score: Some(5),
            url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert_eq!(describe(&item, NOW), "5 points");
    }

    #[test]
    fn hostname_keeps_subdomain() {
        let item = Item {
            url: Some("https://www.rust-lang.org/learn?x=1".to_string()),
            ..Default::default()
        };
        assert_eq!(describe(&item, NOW), "(www.rust-lang.org)");
    }

    #[test]
    fn age_tiers() {
        assert_eq!(format_age(0), "0s ago");
        assert_eq!(format_age(59), "59s ago");
        assert_eq!(format_age(60), "1m ago");
        assert_eq!(format_age(3_599), "59m ago");
        assert_eq!(format_age(3_600), "1h ago");
        assert_eq!(format_age(86_399), "23h ago");
        assert_eq!(format_age(86_400), "1d ago");
        assert_eq!(format_age(400 * 86_400), "400d ago");
    }

    #[test]
    fn age_in_future_clamps_to_zero() {
        assert_eq!(format_age(-30), "0s ago");
    }
}
