//! Per-article enrichment: author productivity, summary and contact emails.
//!
//! [`ArticleEnricher`] turns one [`RawArticleEntry`] from a results page into
//! an [`EnrichedArticle`], or drops it. The building blocks are usable on
//! their own:
//!
//! - [`lookup_publication_count`] - first-author search hit count
//! - [`fetch_and_summarize`] / [`summarize_page`] - abstract and summary
//! - [`EmailExtractor`] / [`extract_emails`] - contact addresses
//! - [`Summarizer`] - keyword-frequency research-need summaries

mod abstracts;
mod author;
mod email;
mod summary;

pub use abstracts::{
    fetch_and_summarize, summarize_page, ArticleSummary, NO_CONTENT_SUMMARY, UNAVAILABLE_SUMMARY,
};
pub use author::lookup_publication_count;
pub use email::{extract_emails, is_placeholder, EmailExtractor, PRIORITY_ZONES};
pub use summary::{KeywordDictionary, KeywordEntry, Summarizer, NO_APPLICATION_SUMMARY};

use std::sync::Arc;

use crate::models::{EnrichedArticle, EnrichedArticleBuilder, RawArticleEntry};
use crate::sources::{FetchMode, Fetcher, PubMedSite, SourceError};

/// Enriches raw result entries into output records.
///
/// Cheap to clone; clones share the fetcher, summarizer and extractor.
#[derive(Debug, Clone)]
pub struct ArticleEnricher {
    fetcher: Arc<dyn Fetcher>,
    site: PubMedSite,
    summarizer: Arc<Summarizer>,
    emails: Arc<EmailExtractor>,
}

impl ArticleEnricher {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        site: PubMedSite,
        summarizer: Summarizer,
    ) -> Result<Self, SourceError> {
        Ok(Self {
            fetcher,
            site,
            summarizer: Arc::new(summarizer),
            emails: Arc::new(EmailExtractor::new()?),
        })
    }

    /// Enrich one entry.
    ///
    /// Returns `None` when the entry has no title link, when the first
    /// author has more than `max_publications` hits, or when any network
    /// step fails. Failures are logged and never propagate.
    pub async fn enrich(
        &self,
        entry: &RawArticleEntry,
        target_term: &str,
        max_publications: Option<u32>,
    ) -> Option<EnrichedArticle> {
        match self.try_enrich(entry, target_term, max_publications).await {
            Ok(article) => article,
            Err(e) => {
                tracing::warn!(
                    "Error processing article {}: {}",
                    entry.title.as_deref().unwrap_or("<untitled>"),
                    e
                );
                None
            }
        }
    }

    async fn try_enrich(
        &self,
        entry: &RawArticleEntry,
        target_term: &str,
        max_publications: Option<u32>,
    ) -> Result<Option<EnrichedArticle>, SourceError> {
        let Some((title, href)) = entry.title_link() else {
            tracing::debug!("Skipping result entry without a title link");
            return Ok(None);
        };
        let article_url = self.site.article_url(href)?;

        let first_author = entry.first_author();
        let publications =
            lookup_publication_count(self.fetcher.as_ref(), &self.site, &first_author).await?;

        if let Some(cap) = max_publications {
            if publications > cap {
                tracing::debug!(
                    "Skipping {}: first author {} has {} publications (cap {})",
                    article_url,
                    first_author,
                    publications,
                    cap
                );
                return Ok(None);
            }
        }

        let html = self.fetcher.fetch(&article_url, FetchMode::Retried).await?;
        let page = summarize_page(&html, &self.summarizer, target_term);
        let emails = self.emails.extract(&html);

        tracing::debug!(
            "Enriched {} ({} emails, {} author publications)",
            article_url,
            emails.len(),
            publications
        );

        Ok(Some(
            EnrichedArticleBuilder::new(title, article_url)
                .authors(entry.author_string())
                .first_author_publications(publications)
                .emails(emails)
                .summary(page.summary)
                .build(),
        ))
    }
}
