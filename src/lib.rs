//! # Antibody Leads
//!
//! Crawls PubMed search results for a protein or topic of interest and
//! turns each hit into a lead: the article, how prolific its first author
//! is, a short summary of what antibodies the work may need, and any
//! contact emails found on the article page.
//!
//! ## Architecture
//!
//! - [`models`]: Search queries, crawl requests, article records, progress events
//! - [`sources`]: The [`sources::Fetcher`] seam and the PubMed page adapter
//! - [`enrich`]: Author lookup, summarization and email extraction per article
//! - [`crawl`]: Page walking, the worker pool and the progress stream
//! - [`utils`]: HTTP client, retry with backoff, jittered delays
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! use antibody_leads::config::Config;
//! use antibody_leads::crawl::scrape;
//! use antibody_leads::models::CrawlRequest;
//! use futures_util::{pin_mut, StreamExt};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let request = CrawlRequest::new("CD47").max_results(20).max_publications(200);
//! let events = scrape(&Config::default(), request);
//! pin_mut!(events);
//!
//! while let Some(event) = events.next().await {
//!     if let Some(article) = event.article {
//!         println!("{:.0}% {} <{}>", event.percent, article.title, article.email);
//!     }
//! }
//! # }
//! ```

pub mod config;
pub mod crawl;
pub mod enrich;
pub mod models;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use crawl::{CrawlUpdate, Crawler};
pub use models::{CrawlRequest, EnrichedArticle, ProgressEvent, SearchQuery};
pub use sources::{Fetcher, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
