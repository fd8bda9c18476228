//! Contact email extraction from article pages.
//!
//! Addresses are searched for in three passes:
//! 1. text of the author/affiliation/correspondence blocks
//! 2. `mailto:` links anywhere on the page
//! 3. the whole raw page, only when the first two found nothing
//!
//! Each pass recognises plain (`a@b.org`), bracket-obfuscated
//! (`a [at] b [dot] org`) and spaced (`a @ b . org`) forms.

use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

use crate::sources::{parse_selector, FetchMode, Fetcher, SourceError};

/// Element classes that usually hold author contact details, in search order
pub const PRIORITY_ZONES: [&str; 5] = [
    "author-list",
    "affiliations",
    "corresp-id",
    "email",
    "author-information",
];

const ZONE_TAGS: [&str; 4] = ["div", "span", "p", "a"];

const PLAIN_PATTERN: &str = r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}\b";
const BRACKET_PATTERN: &str =
    r"(?i)\b[A-Z0-9._%+-]+\s*\[at\]\s*[A-Z0-9.-]+\s*\[dot\]\s*[A-Z]{2,}\b";
const SPACED_PATTERN: &str = r"(?i)\b[A-Z0-9._%+-]+\s*@\s*[A-Z0-9.-]+\s*\.\s*[A-Z]{2,}\b";

/// Compiled patterns and selectors for email extraction
#[derive(Debug, Clone)]
pub struct EmailExtractor {
    patterns: Vec<Regex>,
    at_token: Regex,
    dot_token: Regex,
    zones: Vec<Selector>,
    mailto: Selector,
}

impl EmailExtractor {
    pub fn new() -> Result<Self, SourceError> {
        let compile = |pattern: &str| {
            Regex::new(pattern)
                .map_err(|e| SourceError::Parse(format!("Invalid email pattern: {}", e)))
        };

        let zones = PRIORITY_ZONES
            .iter()
            .map(|class| {
                let css = ZONE_TAGS
                    .iter()
                    .map(|tag| format!("{}.{}", tag, class))
                    .collect::<Vec<_>>()
                    .join(", ");
                parse_selector(&css)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            patterns: vec![
                compile(PLAIN_PATTERN)?,
                compile(BRACKET_PATTERN)?,
                compile(SPACED_PATTERN)?,
            ],
            at_token: compile(r"(?i)\s*\[at\]\s*")?,
            dot_token: compile(r"(?i)\s*\[dot\]\s*")?,
            zones,
            mailto: parse_selector(r#"a[href^="mailto:"]"#)?,
        })
    }

    /// Extract the distinct, normalized, non-placeholder addresses of a page
    pub fn extract(&self, html: &str) -> BTreeSet<String> {
        let mut found = Vec::new();
        {
            let document = Html::parse_document(html);

            for zone in &self.zones {
                for element in document.select(zone) {
                    let text = element.text().collect::<String>();
                    found.extend(self.find_candidates(&text));
                }
            }

            for link in document.select(&self.mailto) {
                if let Some(href) = link.value().attr("href") {
                    let address = href.trim_start_matches("mailto:");
                    let address = address.split('?').next().unwrap_or_default();
                    found.push(address.to_string());
                }
            }
        }

        if found.is_empty() {
            tracing::trace!("No addresses in author zones, scanning whole page");
            found = self.find_candidates(html);
        }
        self.normalize_all(found)
    }

    /// Canonical form of a possibly obfuscated address.
    ///
    /// Idempotent: normalizing a normalized address returns it unchanged.
    pub fn normalize(&self, raw: &str) -> String {
        let address = self.at_token.replace_all(raw, "@");
        let address = self.dot_token.replace_all(&address, ".");
        address.chars().filter(|c| !c.is_whitespace()).collect()
    }

    fn normalize_all(&self, candidates: impl IntoIterator<Item = String>) -> BTreeSet<String> {
        candidates
            .into_iter()
            .map(|candidate| self.normalize(&candidate))
            .filter(|email| !email.is_empty() && email.contains('@') && !is_placeholder(email))
            .collect()
    }

    fn find_candidates(&self, text: &str) -> Vec<String> {
        self.patterns
            .iter()
            .flat_map(|pattern| pattern.find_iter(text))
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Whether an address is a documentation placeholder such as `example@...`
pub fn is_placeholder(email: &str) -> bool {
    let email = email.to_lowercase();
    email.starts_with("example@") || email.ends_with("@example.com")
}

/// Fetch an article page and extract its contact emails.
///
/// Any failure yields an empty set.
pub async fn extract_emails(
    fetcher: &dyn Fetcher,
    extractor: &EmailExtractor,
    url: &str,
) -> BTreeSet<String> {
    match fetcher.fetch(url, FetchMode::Retried).await {
        Ok(html) => extractor.extract(&html),
        Err(e) => {
            tracing::warn!("Error extracting emails from {}: {}", url, e);
            BTreeSet::new()
        }
    }
}
