//! The caller-facing progress event stream.

use async_stream::stream;
use futures_util::{pin_mut, Stream, StreamExt};

use super::{CrawlUpdate, Crawler};
use crate::config::Config;
use crate::models::{CrawlRequest, ProgressEvent};
use crate::sources::SourceError;

/// Convert a crawl into progress events.
///
/// Every article becomes one event. The stream then ends with exactly one
/// terminal event: "Search completed." at 100 percent, or an error event if
/// the crawl failed.
pub fn progress_events<S>(updates: S) -> impl Stream<Item = ProgressEvent> + Send + 'static
where
    S: Stream<Item = Result<CrawlUpdate, SourceError>> + Send + 'static,
{
    stream! {
        pin_mut!(updates);
        let mut failure = None;

        while let Some(update) = updates.next().await {
            match update {
                Ok(update) => yield ProgressEvent::article(update.article, update.percent),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        match failure {
            Some(e) => {
                tracing::error!("Crawl failed: {}", e);
                yield ProgressEvent::failed(e);
            }
            None => yield ProgressEvent::completed(),
        }
    }
}

/// Run a complete crawl against the live site and stream its progress.
///
/// Setup failures (bad base URL, HTTP client construction) are reported as
/// the single terminal error event.
pub fn scrape(config: &Config, request: CrawlRequest) -> impl Stream<Item = ProgressEvent> + Send + 'static {
    let crawler = Crawler::from_config(config);

    stream! {
        match crawler {
            Ok(crawler) => {
                let events = crawler.progress_stream(request);
                pin_mut!(events);
                while let Some(event) = events.next().await {
                    yield event;
                }
            }
            Err(e) => {
                tracing::error!("Could not start crawl: {}", e);
                yield ProgressEvent::failed(e);
            }
        }
    }
}
