//! Bounded worker pool for enriching one results page.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

use crate::enrich::ArticleEnricher;
use crate::models::{EnrichedArticle, RawArticleEntry};

/// Enrichment results of one page, yielded in completion order.
///
/// At most `concurrency` entries are enriched at a time. Once the shared
/// stop flag is raised, entries that have not started are skipped.
pub struct EnrichmentPool {
    receiver: mpsc::Receiver<Option<EnrichedArticle>>,
    submitted: usize,
}

impl EnrichmentPool {
    pub fn spawn(
        enricher: &ArticleEnricher,
        entries: Vec<RawArticleEntry>,
        target_term: &str,
        max_publications: Option<u32>,
        concurrency: usize,
        stop: Arc<AtomicBool>,
    ) -> Self {
        let submitted = entries.len();
        let (sender, receiver) = mpsc::channel(submitted.max(1));
        let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));

        for entry in entries {
            let sender = sender.clone();
            let semaphore = semaphore.clone();
            let enricher = enricher.clone();
            let target_term = target_term.to_string();
            let stop = stop.clone();

            tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if stop.load(Ordering::Acquire) {
                    return;
                }
                let article = enricher
                    .enrich(&entry, &target_term, max_publications)
                    .await;
                // The receiver is gone once the coordinator reached its cap
                let _ = sender.send(article).await;
            });
        }

        Self {
            receiver,
            submitted,
        }
    }

    /// Next finished entry; `None` once every worker has finished.
    ///
    /// The inner `Option` is `None` for entries that were dropped.
    pub async fn next(&mut self) -> Option<Option<EnrichedArticle>> {
        self.receiver.recv().await
    }

    /// Number of entries submitted to the pool
    pub fn submitted(&self) -> usize {
        self.submitted
    }
}
