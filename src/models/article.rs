//! Article models: raw search-result entries and enriched output records.

use serde::{Deserialize, Serialize};

/// Author string used when a result entry lists no authors
pub const NO_AUTHORS: &str = "No authors listed";

/// Email field value used when no address could be extracted
pub const NO_EMAIL: &str = "No valid email found";

/// One article entry parsed from a search-results page.
///
/// Fields are optional because result markup is not guaranteed; the enricher
/// decides what is usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawArticleEntry {
    /// Title text of the result link
    pub title: Option<String>,

    /// Relative link to the article detail page
    pub href: Option<String>,

    /// Comma-separated author list as displayed on the results page
    pub authors: Option<String>,
}

impl RawArticleEntry {
    /// Create an entry with a title link
    pub fn new(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            href: Some(href.into()),
            authors: None,
        }
    }

    /// Set the author list
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    /// The title link, if both title text and href are present and non-empty
    pub fn title_link(&self) -> Option<(&str, &str)> {
        let title = self.title.as_deref().map(str::trim)?;
        let href = self.href.as_deref().map(str::trim)?;
        if title.is_empty() || href.is_empty() {
            return None;
        }
        Some((title, href))
    }

    /// The author string as it will appear in the output record
    pub fn author_string(&self) -> String {
        self.authors
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .unwrap_or(NO_AUTHORS)
            .to_string()
    }

    /// Text before the first comma of the author string, or empty
    pub fn first_author(&self) -> String {
        self.authors
            .as_deref()
            .and_then(|a| a.split(',').next())
            .map(|a| a.trim().to_string())
            .unwrap_or_default()
    }
}

/// The unit of crawl output.
///
/// Built once per successfully enriched entry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedArticle {
    /// Article title
    pub title: String,

    /// Raw author string from the results page
    pub authors: String,

    /// Search-result count for the first author
    pub first_author_publications: u32,

    /// Comma-joined addresses, or [`NO_EMAIL`]
    pub email: String,

    /// Heuristic research-need summary
    pub summary: String,

    /// Absolute URL of the article detail page
    pub source_link: String,
}

impl EnrichedArticle {
    /// Whether an email address was found for this article
    pub fn has_email(&self) -> bool {
        self.email != NO_EMAIL
    }

    /// Extracted addresses as a list
    pub fn email_list(&self) -> Vec<&str> {
        if !self.has_email() {
            return Vec::new();
        }
        self.email
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect()
    }
}

/// Builder for [`EnrichedArticle`]
#[derive(Debug, Clone)]
pub struct EnrichedArticleBuilder {
    article: EnrichedArticle,
}

impl EnrichedArticleBuilder {
    /// Create a new builder with required fields
    pub fn new(title: impl Into<String>, source_link: impl Into<String>) -> Self {
        Self {
            article: EnrichedArticle {
                title: title.into(),
                authors: NO_AUTHORS.to_string(),
                first_author_publications: 0,
                email: NO_EMAIL.to_string(),
                summary: String::new(),
                source_link: source_link.into(),
            },
        }
    }

    /// Set authors
    pub fn authors(mut self, authors: impl Into<String>) -> Self {
        self.article.authors = authors.into();
        self
    }

    /// Set the first author's publication count
    pub fn first_author_publications(mut self, count: u32) -> Self {
        self.article.first_author_publications = count;
        self
    }

    /// Set the email field from a list of addresses
    pub fn emails<I, S>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = emails
            .into_iter()
            .map(|e| e.as_ref().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        self.article.email = if joined.is_empty() {
            NO_EMAIL.to_string()
        } else {
            joined
        };
        self
    }

    /// Set summary
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.article.summary = summary.into();
        self
    }

    /// Build the article
    pub fn build(self) -> EnrichedArticle {
        self.article
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_author() {
        let entry = RawArticleEntry::new("T", "/1/").authors("Smith J, Doe A, Lee K.");
        assert_eq!(entry.first_author(), "Smith J");

        let single = RawArticleEntry::new("T", "/1/").authors("Smith J.");
        assert_eq!(single.first_author(), "Smith J.");

        let none = RawArticleEntry::new("T", "/1/");
        assert_eq!(none.first_author(), "");
        assert_eq!(none.author_string(), NO_AUTHORS);
    }

    #[test]
    fn test_title_link_requires_both_parts() {
        assert!(RawArticleEntry::new("Title", "/123/").title_link().is_some());
        assert!(RawArticleEntry::new("  ", "/123/").title_link().is_none());

        let missing_href = RawArticleEntry {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert!(missing_href.title_link().is_none());
    }

    #[test]
    fn test_builder_email_sentinel() {
        let none: Vec<String> = Vec::new();
        let article = EnrichedArticleBuilder::new("T", "https://x/1/")
            .emails(none)
            .build();
        assert_eq!(article.email, NO_EMAIL);
        assert!(!article.has_email());
        assert!(article.email_list().is_empty());

        let article = EnrichedArticleBuilder::new("T", "https://x/1/")
            .emails(["a@uni.edu", "b@lab.org"])
            .build();
        assert_eq!(article.email, "a@uni.edu, b@lab.org");
        assert_eq!(article.email_list(), vec!["a@uni.edu", "b@lab.org"]);
    }

    #[test]
    fn test_serialized_shape() {
        let article = EnrichedArticleBuilder::new("Title", "https://pubmed.ncbi.nlm.nih.gov/1/")
            .authors("Smith J")
            .first_author_publications(12)
            .summary("S")
            .build();
        let value = serde_json::to_value(&article).unwrap();

        for key in [
            "title",
            "authors",
            "first_author_publications",
            "email",
            "summary",
            "source_link",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["first_author_publications"], 12);
    }
}
