//! Utility modules supporting the crawl.
//!
//! - [`HttpClient`]: reqwest client with timeout and session-level retry
//! - [`RetryConfig`]: Configuration for retry logic with exponential backoff
//! - [`with_retry`]: Execute an operation with automatic retry on transient errors
//! - [`random_page_delay`]: Jittered pause between result pages
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use antibody_leads::sources::SourceError;
//! use antibody_leads::utils::{session_retry_config, with_retry};
//!
//! # async fn fetch_data() -> Result<String, SourceError> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() -> Result<(), SourceError> {
//! let config = session_retry_config().max_attempts(3);
//! let body = with_retry(config, || fetch_data()).await?;
//! # Ok(())
//! # }
//! ```

mod delay;
mod http;
mod retry;

pub use delay::{jittered, random_page_delay};
pub use http::{HttpClient, DEFAULT_USER_AGENT};
pub use retry::{
    session_retry_config, with_retry, RetryConfig, TransientError, RETRY_STATUS_CODES,
};
