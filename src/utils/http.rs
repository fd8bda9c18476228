//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpConfig;
use crate::sources::{FetchMode, Fetcher, SourceError};
use crate::utils::retry::{with_retry, RetryConfig};

/// Browser-like user agent; the site serves reduced markup to unknown clients
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Shared HTTP client with a request timeout and session-level retry.
///
/// Cloning is cheap; all clones share one connection pool, so a single
/// instance can serve every enrichment worker of a crawl.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    retry: RetryConfig,
}

impl HttpClient {
    /// Create a client from HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| SourceError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
            retry: config.retry_config(),
        })
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Network(format!("Request to {} timed out", url))
            } else {
                SourceError::Network(format!("Request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, SourceError> {
        match mode {
            FetchMode::Single => self.get_text(url).await,
            FetchMode::Retried => with_retry(self.retry, || self.get_text(url)).await,
        }
    }
}
