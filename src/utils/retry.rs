//! Retry utilities with exponential backoff for page and article fetches.

use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::sources::SourceError;

/// Server status codes that are worth retrying
pub const RETRY_STATUS_CODES: [u16; 4] = [500, 502, 503, 504];

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay after the first failed attempt
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum total time to spend on retries (including delays)
    pub max_total_time: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        session_retry_config()
    }
}

impl RetryConfig {
    /// Set the maximum number of attempts
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the initial backoff delay
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay to wait after `attempt` (1-based) failed
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return self.initial_delay.min(self.max_delay);
        }
        let exp_delay = self.initial_delay.as_secs_f64()
            * self.backoff_multiplier.powf(attempt as f64 - 1.0);
        Duration::from_secs_f64(exp_delay.max(0.0).min(self.max_delay.as_secs_f64()))
    }
}

/// Transient errors that should trigger a retry
#[derive(Debug, Clone, PartialEq)]
pub enum TransientError {
    /// Network connectivity issues
    Network,
    /// Request timeout
    Timeout,
    /// One of the retryable 5xx statuses
    ServerError(u16),
}

impl TransientError {
    /// Classify a SourceError, returning `None` for permanent failures
    pub fn from_source_error(err: &SourceError) -> Option<Self> {
        match err {
            SourceError::Network(msg) => {
                let msg_lower = msg.to_lowercase();
                if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
                    Some(TransientError::Timeout)
                } else {
                    Some(TransientError::Network)
                }
            }
            SourceError::Status(code) if RETRY_STATUS_CODES.contains(code) => {
                Some(TransientError::ServerError(*code))
            }
            _ => None,
        }
    }
}

/// Execute an async operation with retry logic
///
/// Transient failures (see [`TransientError`]) are retried with exponential
/// backoff until `max_attempts` is reached; permanent failures are returned
/// immediately.
pub async fn with_retry<T, F, Fut>(config: RetryConfig, operation: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, SourceError>>,
{
    let mut attempts = 0;
    let mut total_elapsed = Duration::ZERO;
    let mut operation = operation;

    loop {
        attempts += 1;

        let error = match timeout(config.max_total_time, operation()).await {
            Ok(Ok(result)) => {
                if attempts > 1 {
                    tracing::debug!(
                        "Request succeeded on attempt {} after {} transient failures",
                        attempts,
                        attempts - 1
                    );
                }
                return Ok(result);
            }
            Ok(Err(error)) => error,
            Err(_) => SourceError::Network("Operation timed out".to_string()),
        };

        let Some(transient) = TransientError::from_source_error(&error) else {
            return Err(error);
        };

        let delay = config.delay_for_attempt(attempts);
        total_elapsed += delay;

        if attempts >= config.max_attempts || total_elapsed >= config.max_total_time {
            tracing::warn!(
                "Request failed after {} attempts (total backoff: {:?}): {}",
                attempts,
                total_elapsed,
                error
            );
            return Err(error);
        }

        tracing::debug!(
            "Transient error on attempt {}: {:?}, retrying in {:?}",
            attempts,
            transient,
            delay
        );

        sleep(delay).await;
    }
}

/// Session-level retry: five attempts with a short multiplicative backoff
pub fn session_retry_config() -> RetryConfig {
    RetryConfig {
        max_attempts: 5,
        initial_delay: Duration::from_millis(100),
        max_delay: Duration::from_secs(2),
        backoff_multiplier: 2.0,
        max_total_time: Duration::from_secs(120),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fast_config(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
            max_total_time: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn test_retry_success_first_try() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(fast_config(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Ok("success")
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 1);
    }

    #[tokio::test]
    async fn test_retry_success_after_server_errors() {
        let call_count = Rc::new(RefCell::new(0));

        let result = {
            let call_count = call_count.clone();
            with_retry(fast_config(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    if *call_count.borrow() < 3 {
                        Err(SourceError::Status(502))
                    } else {
                        Ok("success")
                    }
                }
            })
        }
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(*call_count.borrow(), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<(), SourceError> = {
            let call_count = call_count.clone();
            with_retry(fast_config(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(SourceError::Status(503))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(SourceError::Status(503))));
        assert_eq!(*call_count.borrow(), 5);
    }

    #[tokio::test]
    async fn test_retry_returns_permanent_error() {
        let call_count = Rc::new(RefCell::new(0));

        let result: Result<&str, SourceError> = {
            let call_count = call_count.clone();
            with_retry(fast_config(5), move || {
                let call_count = call_count.clone();
                async move {
                    *call_count.borrow_mut() += 1;
                    Err(SourceError::Status(404))
                }
            })
        }
        .await;

        assert!(matches!(result, Err(SourceError::Status(404))));
        assert_eq!(*call_count.borrow(), 1);
    }

    #[test]
    fn test_transient_error_detection() {
        for code in RETRY_STATUS_CODES {
            assert_eq!(
                TransientError::from_source_error(&SourceError::Status(code)),
                Some(TransientError::ServerError(code))
            );
        }
        assert_eq!(
            TransientError::from_source_error(&SourceError::Network("connection reset".into())),
            Some(TransientError::Network)
        );
        assert_eq!(
            TransientError::from_source_error(&SourceError::Network("request timed out".into())),
            Some(TransientError::Timeout)
        );
        assert!(TransientError::from_source_error(&SourceError::Status(501)).is_none());
        assert!(TransientError::from_source_error(&SourceError::Status(429)).is_none());
        assert!(TransientError::from_source_error(&SourceError::Parse("bad".into())).is_none());
    }

    #[test]
    fn test_backoff_schedule() {
        let config = session_retry_config();
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(100));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(200));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(2));
    }

    #[test]
    fn test_negative_multiplier_never_panics() {
        let config = RetryConfig {
            backoff_multiplier: -2.0,
            ..session_retry_config()
        };
        assert_eq!(config.delay_for_attempt(2), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(400));
    }
}
