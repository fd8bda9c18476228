//! First-author productivity lookup.

use crate::sources::{FetchMode, Fetcher, PubMedSite, SourceError};

/// Number of search hits for `author` on the site.
///
/// Issues one unretried request. A missing or unparsable count, or a
/// non-success status page, counts as 0; only transport failures are
/// returned as errors. A blank author name is 0 without any request.
pub async fn lookup_publication_count(
    fetcher: &dyn Fetcher,
    site: &PubMedSite,
    author: &str,
) -> Result<u32, SourceError> {
    let author = author.trim();
    if author.is_empty() {
        return Ok(0);
    }

    let url = site.author_search_url(author);
    match fetcher.fetch(&url, FetchMode::Single).await {
        Ok(html) => Ok(PubMedSite::parse_result_count(&html).unwrap_or(0)),
        Err(SourceError::Status(status)) => {
            tracing::debug!("Author search for {} returned status {}", author, status);
            Ok(0)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockFetcher;

    #[tokio::test]
    async fn test_count_parsed() {
        let site = PubMedSite::with_base_url("http://site/").unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_page(
            site.author_search_url("Smith J"),
            r#"<div class="results-amount"><span class="value">2,345</span></div>"#,
        );

        let count = lookup_publication_count(&fetcher, &site, " Smith J ").await.unwrap();
        assert_eq!(count, 2345);
        assert_eq!(fetcher.requests()[0].1, FetchMode::Single);
    }

    #[tokio::test]
    async fn test_missing_count_is_zero() {
        let site = PubMedSite::with_base_url("http://site/").unwrap();
        let fetcher = MockFetcher::new();
        fetcher.set_page(site.author_search_url("Doe A"), "<p>No results</p>");

        assert_eq!(lookup_publication_count(&fetcher, &site, "Doe A").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_status_error_is_zero_and_not_retried() {
        let site = PubMedSite::with_base_url("http://site/").unwrap();
        let fetcher = MockFetcher::new();
        let url = site.author_search_url("Lee K");
        fetcher.set_status(url.clone(), 503);

        assert_eq!(lookup_publication_count(&fetcher, &site, "Lee K").await.unwrap(), 0);
        assert_eq!(fetcher.request_count(&url), 1);
    }

    #[tokio::test]
    async fn test_blank_author_skips_request() {
        let site = PubMedSite::new();
        let fetcher = MockFetcher::new();

        assert_eq!(lookup_publication_count(&fetcher, &site, "  ").await.unwrap(), 0);
        assert!(fetcher.requests().is_empty());
    }
}
