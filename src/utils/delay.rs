//! Randomized pauses between result pages.

use rand::Rng;
use std::time::Duration;

/// Pick a uniformly random delay in `[min, max]`.
///
/// Returns `min` when the range is empty or inverted.
pub fn jittered(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    let mut rng = rand::thread_rng();
    let millis = rng.gen_range(min.as_millis() as u64..=max.as_millis() as u64);
    Duration::from_millis(millis)
}

/// Sleep for a random interval in `[min, max]`
pub async fn random_page_delay(min: Duration, max: Duration) {
    let delay = jittered(min, max);
    if delay > Duration::ZERO {
        tracing::debug!("Waiting {:?} before the next page", delay);
        tokio::time::sleep(delay).await;
    }
}
