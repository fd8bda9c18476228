//! In-memory fetcher for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::sources::{FetchMode, Fetcher, SourceError};

#[derive(Debug, Clone)]
struct Route {
    body: String,
    failures_left: usize,
    failure_status: u16,
    delay: Duration,
}

/// A fetcher that serves canned bodies keyed by exact URL.
///
/// Unknown URLs answer with status 404. Every request is recorded so tests
/// can assert on what was (and was not) fetched.
#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Route>>,
    requests: Mutex<Vec<(String, FetchMode)>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFetcher {
    /// Create a new mock fetcher with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` for `url`.
    pub fn set_page(&self, url: impl Into<String>, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(
            url.into(),
            Route {
                body: body.into(),
                failures_left: 0,
                failure_status: 500,
                delay: Duration::ZERO,
            },
        );
    }

    /// Answer every request for `url` with `status`.
    pub fn set_status(&self, url: impl Into<String>, status: u16) {
        self.routes.lock().unwrap().insert(
            url.into(),
            Route {
                body: String::new(),
                failures_left: usize::MAX,
                failure_status: status,
                delay: Duration::ZERO,
            },
        );
    }

    /// Fail the next `times` requests for an already-configured `url` with `status`.
    pub fn fail_times(&self, url: &str, times: usize, status: u16) {
        if let Some(route) = self.routes.lock().unwrap().get_mut(url) {
            route.failures_left = times;
            route.failure_status = status;
        }
    }

    /// Delay responses for an already-configured `url`.
    pub fn set_delay(&self, url: &str, delay: Duration) {
        if let Some(route) = self.routes.lock().unwrap().get_mut(url) {
            route.delay = delay;
        }
    }

    /// All requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<(String, FetchMode)> {
        self.requests.lock().unwrap().clone()
    }

    /// Most requests that were ever being answered at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Number of requests received for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(requested, _)| requested == url)
            .count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, mode: FetchMode) -> Result<String, SourceError> {
        self.requests.lock().unwrap().push((url.to_string(), mode));
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let outcome = {
            let mut routes = self.routes.lock().unwrap();
            match routes.get_mut(url) {
                None => None,
                Some(route) if route.failures_left > 0 => {
                    if route.failures_left != usize::MAX {
                        route.failures_left -= 1;
                    }
                    Some((route.delay, Err(SourceError::Status(route.failure_status))))
                }
                Some(route) => Some((route.delay, Ok(route.body.clone()))),
            }
        };

        let result = match outcome {
            None => Err(SourceError::Status(404)),
            Some((delay, result)) => {
                if delay > Duration::ZERO {
                    tokio::time::sleep(delay).await;
                }
                result
            }
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
