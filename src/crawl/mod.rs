//! Crawl orchestration.
//!
//! [`Crawler::crawl`] walks the result pages of a search in order, fans each
//! page's entries out to an [`EnrichmentPool`], and streams enriched
//! articles as they finish until `max_results` articles were emitted or
//! the results run out.
//!
//! ```text
//! page 1 ──fetch──> entries ──pool──> article, article, ...
//!   │  (fetch failed: back off, retry same page)
//!   ▼  (jittered pause)
//! page 2 ...
//! ```
//!
//! [`progress_events`] wraps the article stream into the caller-facing
//! [`ProgressEvent`](crate::models::ProgressEvent) sequence, which always
//! ends with exactly one terminal event.

mod events;
mod pool;

pub use events::{progress_events, scrape};
pub use pool::EnrichmentPool;

use async_stream::stream;
use futures_util::Stream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::{Config, CrawlConfig};
use crate::enrich::{ArticleEnricher, KeywordDictionary, Summarizer};
use crate::models::{
    percent_complete, CrawlRequest, EnrichedArticle, ProgressEvent, RawArticleEntry, SearchQuery,
};
use crate::sources::{FetchMode, Fetcher, PubMedSite, SourceError};
use crate::utils::{random_page_delay, HttpClient};

/// One emitted article and the run's progress after it
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlUpdate {
    pub article: EnrichedArticle,

    /// Articles emitted so far, this one included
    pub processed: usize,

    /// `processed` as a percentage of the requested maximum
    pub percent: f64,

    /// Results page the article was listed on
    pub page: u32,
}

/// Drives a crawl over the site's result pages
#[derive(Debug, Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    site: PubMedSite,
    enricher: ArticleEnricher,
    config: CrawlConfig,
}

impl Crawler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        site: PubMedSite,
        summarizer: Summarizer,
        config: CrawlConfig,
    ) -> Result<Self, SourceError> {
        let enricher = ArticleEnricher::new(fetcher.clone(), site.clone(), summarizer)?;
        Ok(Self {
            fetcher,
            site,
            enricher,
            config,
        })
    }

    /// Crawler talking to the live site as described by `config`
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = HttpClient::from_config(&config.http)?;
        let site = PubMedSite::with_base_url(&config.http.base_url)?;
        let summarizer =
            Summarizer::new(KeywordDictionary::with_extra(&config.summary.extra_keywords));
        Self::new(Arc::new(client), site, summarizer, config.crawl.clone())
    }

    pub fn site(&self) -> &PubMedSite {
        &self.site
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Caller-facing progress events for `request`, ending with one terminal event
    pub fn progress_stream(
        &self,
        request: CrawlRequest,
    ) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        progress_events(self.crawl_request(request))
    }

    /// Crawl using the query derived from the request's target term
    pub fn crawl_request(
        &self,
        request: CrawlRequest,
    ) -> impl Stream<Item = Result<CrawlUpdate, SourceError>> + Send + 'static {
        let query = request.query();
        self.crawl(query, request)
    }

    /// Stream enriched articles for `query`.
    ///
    /// Emits at most `request.max_results` articles with non-decreasing
    /// progress. A results page that fails to load is retried after
    /// `error_backoff` until it loads, or until `max_page_failures`
    /// consecutive failures, which ends the stream with an error.
    pub fn crawl(
        &self,
        query: SearchQuery,
        request: CrawlRequest,
    ) -> impl Stream<Item = Result<CrawlUpdate, SourceError>> + Send + 'static {
        let this = self.clone();

        stream! {
            let max_results = request.max_results;
            let (delay_min, delay_max) = this.config.page_delay_range();
            let stop = Arc::new(AtomicBool::new(false));

            let mut page: u32 = 1;
            let mut processed: usize = 0;
            let mut page_failures: u32 = 0;

            info!("Starting crawl for '{}' (max {} results)", request.target_term, max_results);
            debug!("Search query: {}", query);

            while processed < max_results {
                let entries = match this.fetch_entries(&query, page).await {
                    Ok(entries) => {
                        page_failures = 0;
                        entries
                    }
                    Err(e) => {
                        page_failures += 1;
                        warn!("Error fetching page {}: {}", page, e);
                        if let Some(limit) = this.config.max_page_failures {
                            if page_failures >= limit {
                                yield Err(SourceError::Other(format!(
                                    "results page {} failed {} times in a row: {}",
                                    page, page_failures, e
                                )));
                                break;
                            }
                        }
                        tokio::time::sleep(this.config.error_backoff()).await;
                        continue;
                    }
                };

                if entries.is_empty() {
                    info!("No more results found on page {}", page);
                    break;
                }
                info!("Processing {} entries from page {}", entries.len(), page);

                let mut pool = EnrichmentPool::spawn(
                    &this.enricher,
                    entries,
                    &request.target_term,
                    request.max_publications,
                    this.config.concurrency,
                    stop.clone(),
                );

                while let Some(result) = pool.next().await {
                    let Some(article) = result else {
                        continue;
                    };
                    processed += 1;
                    yield Ok(CrawlUpdate {
                        article,
                        processed,
                        percent: percent_complete(processed, max_results),
                        page,
                    });
                    if processed >= max_results {
                        stop.store(true, Ordering::Release);
                        break;
                    }
                }

                if processed >= max_results {
                    break;
                }
                page += 1;
                random_page_delay(delay_min, delay_max).await;
            }

            info!("Total articles processed: {}", processed);
        }
    }

    async fn fetch_entries(
        &self,
        query: &SearchQuery,
        page: u32,
    ) -> Result<Vec<RawArticleEntry>, SourceError> {
        let url = self.site.results_page_url(query, page);
        let html = self.fetcher.fetch(&url, FetchMode::Retried).await?;
        PubMedSite::parse_results_page(&html)
    }
}
