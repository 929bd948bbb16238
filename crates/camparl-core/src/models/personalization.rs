//! Personalization models - device-scoped ignore lists and feed tokens
//!
//! There are no user accounts; both entities are keyed by an opaque
//! client-generated `device_id` sent as `X-Anon-Id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A bill a device has chosen to hide from its feeds and lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IgnoredBill {
    pub device_id: String,
    pub bill_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl IgnoredBill {
    #[must_use]
    pub fn new(device_id: String, bill_id: Uuid) -> Self {
        Self {
            device_id,
            bill_id,
            created_at: Utc::now(),
        }
    }
}

/// An opaque token mapping to a device's personalized feed at `/feeds/p/{token}`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FeedToken {
    pub token: String,
    pub device_id: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: Option<DateTime<Utc>>,
    pub access_count: i64,
}

impl FeedToken {
    /// Minimum length enforced so tokens aren't guessable nor easily collided.
    pub const MIN_LENGTH: usize = 32;

    #[must_use]
    pub fn new(token: String, device_id: String) -> Self {
        Self {
            token,
            device_id,
            created_at: Utc::now(),
            last_accessed_at: None,
            access_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_tokens_meet_minimum_length() {
        let token = format!("{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple());
        assert!(token.len() >= FeedToken::MIN_LENGTH);
    }
}
