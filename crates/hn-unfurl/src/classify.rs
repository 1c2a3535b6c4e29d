//! Caller classification from the `User-Agent` header.
//!
//! Automated clients (link unfurlers, crawlers, HTTP libraries) get the
//! rendered preview document. Interactive clients are redirected to the
//! origin page.

use regex::{Regex, RegexBuilder};

/// Whether a caller should receive a preview document or a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// A link-preview agent or other tooling.
    Automated,
    /// A human-operated browser.
    Interactive,
}

/// Matches `User-Agent` strings against a fixed set of agent substrings.
#[derive(Debug, Clone)]
pub struct CallerClassifier {
    /// `None` when no patterns were supplied.
    matcher: Option<Regex>,
}

impl CallerClassifier {
    /// Compile a classifier from a list of substrings.
    ///
    /// Patterns are matched literally and case-insensitively.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let alternation = patterns
            .into_iter()
            .map(|p| regex::escape(p.as_ref()))
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("|");

        // An empty alternation would match everything.
        if alternation.is_empty() {
            return Ok(Self { matcher: None });
        }

        let matcher = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;
        Ok(Self {
            matcher: Some(matcher),
        })
    }

    /// Classify a caller by its identity string.
    ///
    /// A missing header is treated as automated.
    pub fn classify(&self, user_agent: Option<&str>) -> Classification {
        match user_agent {
            None => Classification::Automated,
            Some(ua) if self.matcher.as_ref().is_some_and(|m| m.is_match(ua)) => {
                Classification::Automated
            }
            Some(_) => Classification::Interactive,
        }
    }
}
