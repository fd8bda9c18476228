//! Core data models for search queries, articles and progress events.

mod article;
mod progress;
mod search;

pub use article::{EnrichedArticle, EnrichedArticleBuilder, RawArticleEntry, NO_AUTHORS, NO_EMAIL};
pub use progress::{percent_complete, ProgressEvent, COMPLETED_MESSAGE};
pub use search::{CrawlRequest, SearchQuery, DEFAULT_MAX_RESULTS, RELATED_TERMS};
