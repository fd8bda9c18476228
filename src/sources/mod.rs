//! The literature site seam: HTTP capability and the PubMed HTML adapter.
//!
//! Everything that talks to the network goes through the [`Fetcher`] trait so
//! the enrichment and crawl layers can be driven by [`MockFetcher`] in tests.
//! [`PubMedSite`] knows the site's URL scheme and page markup and nothing
//! about networking.
//!
//! # Fetch modes
//!
//! - [`FetchMode::Retried`] - session-level retry on 500/502/503/504 and
//!   network failures (result pages, article pages)
//! - [`FetchMode::Single`] - exactly one request (author productivity lookups)

mod mock;
mod pubmed;

pub use mock::MockFetcher;
pub use pubmed::{ArticleText, PubMedSite, PUBMED_BASE_URL};
pub(crate) use pubmed::{element_text, parse_selector};

use async_trait::async_trait;

/// How a request should be issued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Retry transient failures with backoff
    Retried,
    /// Issue a single request, no retry
    Single,
}

/// The HTTP capability consumed by the enrichment and crawl layers.
///
/// Implementations must be safe to share between concurrently running
/// enrichment workers.
#[async_trait]
pub trait Fetcher: Send + Sync + std::fmt::Debug {
    /// Fetch `url` and return the response body as text.
    ///
    /// Non-success status codes are reported as [`SourceError::Status`].
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, SourceError>;
}

/// Errors that can occur when talking to the literature site
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Parsing error (HTML, numbers, etc.)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return SourceError::Status(status.as_u16());
        }
        SourceError::Network(err.to_string())
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::InvalidRequest(format!("URL: {}", err))
    }
}
