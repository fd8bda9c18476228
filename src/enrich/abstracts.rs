//! Article body retrieval and summarization.

use serde::{Deserialize, Serialize};

use super::Summarizer;
use crate::sources::{ArticleText, FetchMode, Fetcher, PubMedSite};

/// Summary when the page has neither an abstract nor full text
pub const NO_CONTENT_SUMMARY: &str = "No abstract or full text available for summarization.";

/// Summary when the article page could not be fetched
pub const UNAVAILABLE_SUMMARY: &str = "Unable to access article content for summarization.";

/// Characters of full text kept in the returned body
const FULL_TEXT_PREVIEW_CHARS: usize = 500;

/// Body text of an article page and its research-need summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSummary {
    /// Abstract, a full-text preview, or empty
    pub body: String,
    pub summary: String,
}

impl ArticleSummary {
    fn unavailable() -> Self {
        Self {
            body: String::new(),
            summary: UNAVAILABLE_SUMMARY.to_string(),
        }
    }
}

/// Summarize an already fetched article page.
///
/// Prefers the abstract; falls back to the full text, which is summarized in
/// full but returned as a 500-character preview ending in "...".
pub fn summarize_page(html: &str, summarizer: &Summarizer, target_term: &str) -> ArticleSummary {
    match PubMedSite::parse_article_text(html) {
        Ok(ArticleText::Abstract(text)) => ArticleSummary {
            summary: summarizer.summarize(&text, target_term),
            body: text,
        },
        Ok(ArticleText::FullText(text)) => ArticleSummary {
            summary: summarizer.summarize(&text, target_term),
            body: preview(&text),
        },
        Ok(ArticleText::Missing) => ArticleSummary {
            body: String::new(),
            summary: NO_CONTENT_SUMMARY.to_string(),
        },
        Err(e) => {
            tracing::warn!("Could not read article page: {}", e);
            ArticleSummary::unavailable()
        }
    }
}

/// Fetch an article page and summarize it.
///
/// Never fails: fetch errors produce [`UNAVAILABLE_SUMMARY`] with an empty body.
pub async fn fetch_and_summarize(
    fetcher: &dyn Fetcher,
    summarizer: &Summarizer,
    url: &str,
    target_term: &str,
) -> ArticleSummary {
    match fetcher.fetch(url, FetchMode::Retried).await {
        Ok(html) => summarize_page(&html, summarizer, target_term),
        Err(e) => {
            tracing::warn!("Error fetching abstract from {}: {}", url, e);
            ArticleSummary::unavailable()
        }
    }
}

/// First 500 characters of the full text, always marked as a preview with "..."
fn preview(text: &str) -> String {
    let head = text.chars().take(FULL_TEXT_PREVIEW_CHARS).collect::<String>();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockFetcher;

    #[test]
    fn test_abstract_preferred() {
        let html = r#"
            <div class="abstract-content selected"><p>A vaccine study.</p></div>
            <div class="full-text">Therapeutic work.</div>
        "#;
        let result = summarize_page(html, &Summarizer::default(), "");
        assert_eq!(result.body, "A vaccine study.");
        assert!(result.summary.contains("immunization research"));
        assert!(!result.summary.contains("treatment development"));
    }

    #[test]
    fn test_full_text_preview_truncated() {
        let long = format!("The antibody {}", "é".repeat(600));
        let html = format!(r#"<div class="full-text">{}</div>"#, long);

        let result = summarize_page(&html, &Summarizer::default(), "");
        assert_eq!(result.body.chars().count(), FULL_TEXT_PREVIEW_CHARS + 3);
        assert!(result.body.ends_with("..."));
        assert!(result.summary.contains("general antibody research"));
    }

    #[test]
    fn test_short_full_text_still_marked_as_preview() {
        let html = r#"<div class="full-text">Short text.</div>"#;
        let result = summarize_page(html, &Summarizer::default(), "");
        assert_eq!(result.body, "Short text....");
    }

    #[test]
    fn test_missing_content() {
        let result = summarize_page("<p>Nothing here</p>", &Summarizer::default(), "CD47");
        assert_eq!(result.body, "");
        assert_eq!(result.summary, NO_CONTENT_SUMMARY);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_reported_in_summary() {
        let fetcher = MockFetcher::new();
        let result =
            fetch_and_summarize(&fetcher, &Summarizer::default(), "http://site/9/", "CD47").await;
        assert_eq!(result.body, "");
        assert_eq!(result.summary, UNAVAILABLE_SUMMARY);
    }

    #[tokio::test]
    async fn test_fetch_uses_retried_mode() {
        let fetcher = MockFetcher::new();
        fetcher.set_page(
            "http://site/1/",
            r#"<div class="abstract-content selected">ELISA data.</div>"#,
        );
        let result =
            fetch_and_summarize(&fetcher, &Summarizer::default(), "http://site/1/", "").await;

        assert_eq!(result.body, "ELISA data.");
        assert_eq!(
            fetcher.requests(),
            vec![("http://site/1/".to_string(), FetchMode::Retried)]
        );
    }
}
