//! Provenance stub attached to every fetched batch: where it came from, when,
//! and a content hash so callers can detect byte-identical re-fetches.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    pub source_url: String,
    pub fetched_at: DateTime<Utc>,
    pub content_hash: String,
}

impl Provenance {
    #[must_use]
    pub fn new(source_url: impl Into<String>, body: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(body);
        Self {
            source_url: source_url.into(),
            fetched_at: Utc::now(),
            content_hash: format!("{:x}", hasher.finalize()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_body_yields_same_hash() {
        let a = Provenance::new("https://example.test/a", b"hello");
        let b = Provenance::new("https://example.test/b", b"hello");
        assert_eq!(a.content_hash, b.content_hash);
    }

    #[test]
    fn different_body_yields_different_hash() {
        let a = Provenance::new("https://example.test/a", b"hello");
        let b = Provenance::new("https://example.test/a", b"goodbye");
        assert_ne!(a.content_hash, b.content_hash);
    }
}
