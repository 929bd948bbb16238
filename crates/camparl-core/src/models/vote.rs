//! Vote (division) model - a recorded ballot in the House or Senate

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Outcome of a division vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
pub enum VoteResult {
    Passed,
    Defeated,
    Tied,
}

impl VoteResult {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Defeated => "defeated",
            Self::Tied => "tied",
        }
    }
}

/// A recorded division, keyed by `(jurisdiction, vote_id)` where `vote_id` is
/// `{parliament}-{session}-{number}`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub jurisdiction: String,
    pub vote_id: String,
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub vote_date: NaiveDate,
    /// "house" or "senate"
    pub chamber: String,
    pub description_en: Option<String>,
    pub description_fr: Option<String>,
    pub result: VoteResult,
    pub yea_count: i32,
    pub nay_count: i32,
    pub abstain_count: i32,
    pub bill_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vote {
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        jurisdiction: String,
        parliament: i16,
        session: i16,
        number: i32,
        vote_date: NaiveDate,
        chamber: String,
        result: VoteResult,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            jurisdiction,
            vote_id: format!("{parliament}-{session}-{number}"),
            parliament,
            session,
            number,
            vote_date,
            chamber,
            description_en: None,
            description_fr: None,
            result,
            yea_count: 0,
            nay_count: 0,
            abstain_count: 0,
            bill_id: None,
            source_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn with_counts(mut self, yea: i32, nay: i32, abstain: i32) -> Self {
        self.yea_count = yea;
        self.nay_count = nay;
        self.abstain_count = abstain;
        self
    }

    #[must_use]
    pub const fn total_cast(&self) -> i32 {
        self.yea_count + self.nay_count + self.abstain_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_id_matches_natural_key_format() {
        let v = Vote::new(
            "ca-federal".into(),
            44,
            1,
            123,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "house".into(),
            VoteResult::Passed,
        );
        assert_eq!(v.vote_id, "44-1-123");
    }
}
