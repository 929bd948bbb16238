//! Vote record model - a single MP's ballot on a vote

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// How a politician voted on a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
pub enum VotePosition {
    Yea,
    Nay,
    Paired,
    Abstain,
}

impl VotePosition {
    /// Normalizes upstream free-text positions ("Yes", "Yea", "Nay", "No", "Paired", "Abstained")
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "yes" | "yea" | "aye" => Self::Yea,
            "no" | "nay" => Self::Nay,
            "paired" => Self::Paired,
            _ => Self::Abstain,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yea => "yea",
            Self::Nay => "nay",
            Self::Paired => "paired",
            Self::Abstain => "abstain",
        }
    }
}

/// A single politician's ballot, keyed by `(vote_id, politician_id)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct VoteRecord {
    pub id: Uuid,
    pub vote_id: Uuid,
    pub politician_id: Uuid,
    pub position: VotePosition,
    pub raw_position: Option<String>,
    pub party_at_vote: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VoteRecord {
    #[must_use]
    pub fn new(vote_id: Uuid, politician_id: Uuid, position: VotePosition, raw_position: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            vote_id,
            politician_id,
            position,
            raw_position,
            party_at_vote: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn is_yea(&self) -> bool {
        matches!(self.position, VotePosition::Yea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_variants() {
        assert_eq!(VotePosition::normalize("Yea"), VotePosition::Yea);
        assert_eq!(VotePosition::normalize("Yes"), VotePosition::Yea);
        assert_eq!(VotePosition::normalize("No"), VotePosition::Nay);
        assert_eq!(VotePosition::normalize("Paired"), VotePosition::Paired);
        assert_eq!(VotePosition::normalize("anything else"), VotePosition::Abstain);
    }
}
