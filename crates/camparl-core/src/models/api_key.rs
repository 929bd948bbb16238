//! API key model - hashed, rate-limited credentials for `/api/v1/*`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A credential issued to a consumer. The raw key is returned exactly once at
/// creation and never stored - only its SHA-256 hash is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApiKey {
    pub id: Uuid,
    pub name: String,
    /// Hex-encoded SHA-256 digest of the raw key
    pub key_hash: String,
    pub is_active: bool,
    pub requests_per_hour: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub request_count: i64,
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    #[must_use]
    pub fn new(name: String, key_hash: String, requests_per_hour: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            key_hash,
            is_active: true,
            requests_per_hour,
            expires_at: None,
            last_used_at: None,
            request_count: 0,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.is_none_or(|exp| exp > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn inactive_key_is_unusable() {
        let mut key = ApiKey::new("ci".into(), "hash".into(), 1000);
        key.is_active = false;
        assert!(!key.is_usable(Utc::now()));
    }

    #[test]
    fn expired_key_is_unusable() {
        let mut key = ApiKey::new("ci".into(), "hash".into(), 1000);
        key.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(!key.is_usable(Utc::now()));
    }

    #[test]
    fn key_without_expiration_never_expires() {
        let key = ApiKey::new("ci".into(), "hash".into(), 1000);
        assert!(key.is_usable(Utc::now()));
    }
}
