//! Committee model - House/Senate/joint standing or special committees

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A parliamentary committee, keyed by `(jurisdiction, parliament, session, slug)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Committee {
    pub id: Uuid,
    pub jurisdiction: String,
    pub parliament: i16,
    pub session: i16,
    pub slug: String,
    pub name_en: String,
    pub name_fr: Option<String>,
    pub acronym: Option<String>,
    /// "house", "senate", or "joint"
    pub chamber: String,
    pub parent_committee_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Committee {
    #[must_use]
    pub fn new(
        jurisdiction: String,
        parliament: i16,
        session: i16,
        slug: String,
        name_en: String,
        chamber: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            jurisdiction,
            parliament,
            session,
            slug,
            name_en,
            name_fr: None,
            acronym: None,
            chamber,
            parent_committee_id: None,
            source_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn is_joint(&self) -> bool {
        self.chamber == "joint"
    }
}

/// A scheduled meeting of a committee, keyed by `(committee_id, meeting_number, parliament, session)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommitteeMeeting {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub meeting_number: i32,
    pub parliament: i16,
    pub session: i16,
    pub meeting_date: chrono::NaiveDate,
    pub meeting_time: Option<chrono::NaiveTime>,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    /// e.g. "public", "in_camera", "televised"
    pub meeting_type: Option<String>,
    pub room: Option<String>,
    /// `[{name, org, title}]`
    pub witnesses: serde_json::Value,
    /// `[{title, url, doc_type}]`
    pub documents: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommitteeMeeting {
    #[must_use]
    pub fn new(committee_id: Uuid, meeting_number: i32, parliament: i16, session: i16, meeting_date: chrono::NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            committee_id,
            meeting_number,
            parliament,
            session,
            meeting_date,
            meeting_time: None,
            title_en: None,
            title_fr: None,
            meeting_type: None,
            room: None,
            witnesses: serde_json::Value::Array(Vec::new()),
            documents: serde_json::Value::Array(Vec::new()),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_committee_has_no_chamber() {
        let c = Committee::new("ca-federal".into(), 44, 1, "fewo".into(), "Status of Women".into(), "joint".into());
        assert!(c.is_joint());
    }
}
