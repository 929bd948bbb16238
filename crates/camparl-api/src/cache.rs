//! Shared feed-body / search-result cache. Cache loss never affects
//! correctness, only latency - every value here is reconstructible from the
//! store.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use moka::Expiry;
use moka::sync::Cache as MokaCache;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub body: String,
    pub content_type: &'static str,
    pub etag: String,
    pub last_modified: DateTime<Utc>,
    ttl_secs: u64,
}

impl CacheEntry {
    #[must_use]
    pub fn new(body: String, content_type: &'static str, fingerprint: &str, last_modified: DateTime<Utc>, ttl_secs: u64) -> Self {
        Self { body, content_type, etag: format!("\"{fingerprint}\""), last_modified, ttl_secs }
    }
}

struct ScopedExpiry;

impl Expiry<String, CacheEntry> for ScopedExpiry {
    fn expire_after_create(&self, _key: &String, value: &CacheEntry, _created_at: Instant) -> Option<Duration> {
        Some(Duration::from_secs(value.ttl_secs))
    }
}

/// Wraps a single `moka` cache keyed by scope (feed path, or normalized
/// search query) to string bodies with per-entry TTL.
#[derive(Clone)]
pub struct Cache {
    inner: MokaCache<String, CacheEntry>,
}

impl Cache {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        let inner = MokaCache::builder().max_capacity(max_capacity).expire_after(ScopedExpiry).build();
        Self { inner }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: String, value: CacheEntry) {
        self.inner.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_wraps_fingerprint_in_quotes() {
        let entry = CacheEntry::new("body".to_string(), "text/plain", "abc123", Utc::now(), 60);
        assert_eq!(entry.etag, "\"abc123\"");
    }

    #[test]
    fn insert_then_get_round_trips() {
        let cache = Cache::new(10);
        let entry = CacheEntry::new("body".to_string(), "text/plain", "fp", Utc::now(), 60);
        cache.insert("scope".to_string(), entry.clone());
        let fetched = cache.get("scope").expect("just inserted");
        assert_eq!(fetched.etag, entry.etag);
    }
}
