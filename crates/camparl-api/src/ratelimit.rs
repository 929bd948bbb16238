//! Shared token-bucket primitives. One `governor` quota type backs every
//! rate limit in this crate - API keys, source IPs, feed tokens, and the
//! feed rebuild budget all key into a `DashMap` of the same limiter type.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Duration, Utc};
use governor::clock::{Clock, QuantaClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

pub type Limiter = DefaultDirectRateLimiter;

#[must_use]
pub fn per_hour(n: u32) -> Arc<Limiter> {
    let n = NonZeroU32::new(n.max(1)).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_hour(n)))
}

/// Checks out one token. `Err` carries the number of seconds the caller
/// should wait before retrying, for a `Retry-After` header.
///
/// # Errors
/// Returns the retry delay in seconds when the bucket is exhausted.
pub fn check(limiter: &Limiter) -> Result<(), u64> {
    limiter.check().map_err(|not_until| {
        let clock = QuantaClock::default();
        not_until.wait_time_from(clock.now()).as_secs().max(1)
    })
}

/// Headers to attach to a rate-limited response on success.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitHeaders {
    pub limit: u32,
    pub remaining: u32,
    pub reset: DateTime<Utc>,
}

/// Pairs a `governor` token bucket with a coarse, hourly-reset counter for
/// `X-RateLimit-Remaining`/`X-RateLimit-Reset`. `governor`'s GCRA state isn't
/// introspectable from outside, so the counter is tracked alongside it; under
/// concurrent bursts it may be off by a request or two, which is acceptable
/// for an advisory header.
pub struct HourlyLimiter {
    limiter: Arc<Limiter>,
    limit: u32,
    remaining: AtomicU32,
    resets_at: Mutex<DateTime<Utc>>,
}

impl HourlyLimiter {
    #[must_use]
    pub fn new(limit: u32) -> Self {
        Self {
            limiter: per_hour(limit),
            limit,
            remaining: AtomicU32::new(limit),
            resets_at: Mutex::new(Utc::now() + Duration::hours(1)),
        }
    }

    fn roll_window(&self) -> DateTime<Utc> {
        let mut resets_at = self.resets_at.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let now = Utc::now();
        if now >= *resets_at {
            self.remaining.store(self.limit, Ordering::SeqCst);
            *resets_at = now + Duration::hours(1);
        }
        *resets_at
    }

    /// # Errors
    /// Returns the retry delay in seconds when the bucket is exhausted.
    pub fn check(&self) -> Result<RateLimitHeaders, u64> {
        let reset = self.roll_window();
        check(&self.limiter)?;
        let remaining = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |r| Some(r.saturating_sub(1)))
            .unwrap_or(0);
        Ok(RateLimitHeaders { limit: self.limit, remaining, reset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_down_per_check() {
        let limiter = HourlyLimiter::new(5);
        let first = limiter.check().unwrap();
        assert_eq!(first.remaining, 4);
        let second = limiter.check().unwrap();
        assert_eq!(second.remaining, 3);
        assert_eq!(second.limit, 5);
    }

    #[test]
    fn exhausted_bucket_reports_retry_after() {
        let limiter = HourlyLimiter::new(1);
        limiter.check().unwrap();
        let err = limiter.check().unwrap_err();
        assert!(err >= 1);
    }

    #[test]
    fn zero_limit_clamps_to_one() {
        let limiter = per_hour(0);
        assert!(check(&limiter).is_ok());
        assert!(check(&limiter).is_err());
    }
}
