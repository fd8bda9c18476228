//! PubMed web site adapter: URL scheme and page markup.
//!
//! This works on the public HTML pages rather than the E-utilities API, so
//! the selectors below track the site's result and article templates.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{RawArticleEntry, SearchQuery};
use crate::sources::SourceError;

/// PubMed web front end
pub const PUBMED_BASE_URL: &str = "https://pubmed.ncbi.nlm.nih.gov/";

const RESULT_ENTRY: &str = "article.full-docsum";
const RESULT_TITLE: &str = "a.docsum-title";
const RESULT_AUTHORS: &str = "span.docsum-authors.full-authors";
const RESULT_COUNT: &str = "span.value";
const ARTICLE_ABSTRACT: &str = "div.abstract-content.selected";
const ARTICLE_FULL_TEXT: &str = "div.full-text";

/// Text content found on an article detail page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleText {
    /// The selected abstract block
    Abstract(String),
    /// The full-text block (no abstract present)
    FullText(String),
    /// Neither block present
    Missing,
}

/// PubMed site adapter
#[derive(Debug, Clone)]
pub struct PubMedSite {
    base_url: Url,
}

impl PubMedSite {
    /// Adapter for the public PubMed site
    pub fn new() -> Self {
        Self::default()
    }

    /// Adapter rooted at a different base URL (mirrors, local test servers)
    pub fn with_base_url(base_url: &str) -> Result<Self, SourceError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url })
    }

    /// The base URL all links are resolved against
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of one page of search results (pages start at 1)
    pub fn results_page_url(&self, query: &SearchQuery, page: u32) -> String {
        format!(
            "{}?term={}&page={}",
            self.base_url,
            urlencoding::encode(query.as_str()),
            page
        )
    }

    /// URL of the author search used for productivity lookups
    pub fn author_search_url(&self, author: &str) -> String {
        let term = format!("{}[Author]", author);
        format!("{}?term={}", self.base_url, urlencoding::encode(&term))
    }

    /// Resolve a result entry's relative link into an absolute article URL
    pub fn article_url(&self, href: &str) -> Result<String, SourceError> {
        let url = self.base_url.join(href.trim().trim_start_matches('/'))?;
        Ok(url.to_string())
    }

    /// Parse the article entries of a results page, in listing order
    pub fn parse_results_page(html: &str) -> Result<Vec<RawArticleEntry>, SourceError> {
        let document = Html::parse_document(html);
        let entry_selector = parse_selector(RESULT_ENTRY)?;
        let title_selector = parse_selector(RESULT_TITLE)?;
        let authors_selector = parse_selector(RESULT_AUTHORS)?;

        let entries = document
            .select(&entry_selector)
            .map(|entry| {
                let title_link = entry.select(&title_selector).next();
                RawArticleEntry {
                    title: title_link.map(element_text),
                    href: title_link
                        .and_then(|a| a.value().attr("href"))
                        .map(str::to_string),
                    authors: entry.select(&authors_selector).next().map(element_text),
                }
            })
            .collect();

        Ok(entries)
    }

    /// Parse the total hit count shown on a results page.
    ///
    /// Returns `None` when the count element is missing or not a number.
    pub fn parse_result_count(html: &str) -> Option<u32> {
        let document = Html::parse_document(html);
        let selector = parse_selector(RESULT_COUNT).ok()?;
        let text = element_text(document.select(&selector).next()?);
        text.replace(',', "").trim().parse().ok()
    }

    /// Extract the abstract, or failing that the full text, of an article page
    pub fn parse_article_text(html: &str) -> Result<ArticleText, SourceError> {
        let document = Html::parse_document(html);

        let abstract_selector = parse_selector(ARTICLE_ABSTRACT)?;
        if let Some(block) = document.select(&abstract_selector).next() {
            return Ok(ArticleText::Abstract(element_text(block)));
        }

        let full_text_selector = parse_selector(ARTICLE_FULL_TEXT)?;
        if let Some(block) = document.select(&full_text_selector).next() {
            return Ok(ArticleText::FullText(element_text(block)));
        }

        Ok(ArticleText::Missing)
    }
}

impl Default for PubMedSite {
    fn default() -> Self {
        Self::with_base_url(PUBMED_BASE_URL).expect("PubMed base URL is valid")
    }
}

/// Parse a CSS selector, reporting failures as [`SourceError::Parse`]
pub(crate) fn parse_selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css)
        .map_err(|e| SourceError::Parse(format!("Invalid selector '{}': {}", css, e)))
}

/// Text content of an element with runs of whitespace collapsed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
        <span class="value">1,234</span>
        <article class="full-docsum">
            <a class="docsum-title" href="/38000001/">
                CD47 blockade with a <b>monoclonal</b> antibody
            </a>
            <span class="docsum-authors full-authors">Smith J, Doe A, Lee K.</span>
        </article>
        <article class="full-docsum">
            <a class="docsum-title" href="/38000002/">Second article</a>
        </article>
        <article class="full-docsum">
            <span class="docsum-authors full-authors">Orphan B.</span>
        </article>
        </body></html>
    "#;

    #[test]
    fn test_results_page_url() {
        let site = PubMedSite::new();
        let query = SearchQuery::new("\"CD47\"[Title/Abstract]");
        let url = site.results_page_url(&query, 3);

        assert!(url.starts_with("https://pubmed.ncbi.nlm.nih.gov/?term="));
        assert!(url.contains("%22CD47%22%5BTitle%2FAbstract%5D"));
        assert!(url.ends_with("&page=3"));
    }

    #[test]
    fn test_author_search_url() {
        let site = PubMedSite::new();
        let url = site.author_search_url("Smith J");
        assert_eq!(
            url,
            "https://pubmed.ncbi.nlm.nih.gov/?term=Smith%20J%5BAuthor%5D"
        );
    }

    #[test]
    fn test_article_url_resolution() {
        let site = PubMedSite::new();
        assert_eq!(
            site.article_url("/38000001/").unwrap(),
            "https://pubmed.ncbi.nlm.nih.gov/38000001/"
        );

        let local = PubMedSite::with_base_url("http://127.0.0.1:8080/mirror").unwrap();
        assert_eq!(
            local.article_url("/1/").unwrap(),
            "http://127.0.0.1:8080/mirror/1/"
        );
    }

    #[test]
    fn test_parse_results_page() {
        let entries = PubMedSite::parse_results_page(RESULTS_PAGE).unwrap();
        assert_eq!(entries.len(), 3);

        assert_eq!(
            entries[0].title.as_deref(),
            Some("CD47 blockade with a monoclonal antibody")
        );
        assert_eq!(entries[0].href.as_deref(), Some("/38000001/"));
        assert_eq!(entries[0].authors.as_deref(), Some("Smith J, Doe A, Lee K."));

        assert_eq!(entries[1].authors, None);
        assert!(entries[2].title_link().is_none());
    }

    #[test]
    fn test_parse_empty_results_page() {
        let entries = PubMedSite::parse_results_page("<html><body>No results</body></html>");
        assert!(entries.unwrap().is_empty());
    }

    #[test]
    fn test_parse_result_count() {
        assert_eq!(PubMedSite::parse_result_count(RESULTS_PAGE), Some(1234));
        assert_eq!(PubMedSite::parse_result_count("<p>nothing</p>"), None);
        assert_eq!(
            PubMedSite::parse_result_count(r#"<span class="value">many</span>"#),
            None
        );
    }

    #[test]
    fn test_parse_article_text() {
        let with_abstract = r#"
            <div class="abstract-content selected"><p>Antibody   binding.</p></div>
            <div class="full-text">Ignored</div>
        "#;
        assert_eq!(
            PubMedSite::parse_article_text(with_abstract).unwrap(),
            ArticleText::Abstract("Antibody binding.".to_string())
        );

        let full_text = r#"<div class="full-text">Body text</div>"#;
        assert_eq!(
            PubMedSite::parse_article_text(full_text).unwrap(),
            ArticleText::FullText("Body text".to_string())
        );

        assert_eq!(
            PubMedSite::parse_article_text("<p>x</p>").unwrap(),
            ArticleText::Missing
        );
    }
}
