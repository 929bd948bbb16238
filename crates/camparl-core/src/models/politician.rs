//! Politician model - a sitting or former member of Parliament

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A federal politician, keyed by `(jurisdiction, politician_id)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Politician {
    pub id: Uuid,
    pub jurisdiction: String,
    /// Stable source identifier, e.g. an OurCommons.ca person id
    pub politician_id: String,
    pub first_name: String,
    pub last_name: String,
    pub current_party: Option<String>,
    pub current_riding: Option<String>,
    pub photo_url: Option<String>,
    pub source_url: Option<String>,
    /// Arbitrary-structured history of party/riding membership over time
    pub memberships: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Politician {
    #[must_use]
    pub fn new(jurisdiction: String, politician_id: String, first_name: String, last_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            jurisdiction,
            politician_id,
            first_name,
            last_name,
            current_party: None,
            current_riding: None,
            photo_url: None,
            source_url: None,
            memberships: serde_json::Value::Array(Vec::new()),
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
