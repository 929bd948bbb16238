//! Token-bucket rate limiting, one bucket per source, shared across
//! concurrent adapter instances in the same process via `Arc`.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{Quota, RateLimiter as GovernorLimiter};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};

use crate::error::AdapterError;

type Inner = GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// A process-shared rate limiter for one upstream source.
#[derive(Clone)]
pub struct SourceRateLimiter {
    inner: Arc<Inner>,
}

impl SourceRateLimiter {
    /// Builds a limiter sustaining `per_second` requests/sec with the given burst capacity.
    ///
    /// # Panics
    /// Panics if `per_second` or `burst` round down to zero.
    #[must_use]
    pub fn new(per_second: f64, burst: u32) -> Self {
        let burst = NonZeroU32::new(burst).expect("burst must be non-zero");
        let quota = if per_second >= 1.0 {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rps = NonZeroU32::new(per_second as u32).expect("per_second must be non-zero");
            Quota::per_second(rps).allow_burst(burst)
        } else {
            let period = Duration::from_secs_f64(1.0 / per_second);
            Quota::with_period(period)
                .expect("period must be non-zero")
                .allow_burst(burst)
        };
        Self {
            inner: Arc::new(GovernorLimiter::direct(quota)),
        }
    }

    /// The catalogue source's bucket: 2 req/sec sustained, burst 10.
    #[must_use]
    pub fn catalogue() -> Self {
        Self::new(2.0, 10)
    }

    /// The enrichment source's bucket: 0.5 req/sec sustained, burst 2.
    #[must_use]
    pub fn enrichment() -> Self {
        Self::new(0.5, 2)
    }

    /// Waits for one token, up to `timeout`. Exceeding the timeout raises a
    /// transient error rather than blocking the caller indefinitely.
    ///
    /// # Errors
    /// Returns `AdapterError::RateLimitTimeout` if no token becomes available in time.
    pub async fn acquire(&self, timeout: Duration) -> Result<(), AdapterError> {
        tokio::time::timeout(timeout, async {
            loop {
                match self.inner.check() {
                    Ok(()) => return,
                    Err(not_until) => {
                        let wait = not_until.wait_time_from(governor::clock::Clock::now(&DefaultClock::default()));
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        })
        .await
        .map_err(|_| AdapterError::RateLimitTimeout(timeout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn burst_is_available_immediately() {
        let limiter = SourceRateLimiter::new(2.0, 3);
        for _ in 0..3 {
            limiter.acquire(Duration::from_millis(50)).await.unwrap();
        }
    }

    #[tokio::test]
    async fn exhausted_bucket_eventually_refills() {
        let limiter = SourceRateLimiter::new(10.0, 1);
        limiter.acquire(Duration::from_millis(50)).await.unwrap();
        // second immediate acquire should still succeed within a generous timeout
        // once the bucket refills at 10/sec (~100ms).
        limiter.acquire(Duration::from_millis(500)).await.unwrap();
    }
}
