//! Debate and speech models - Hansard transcripts

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A sitting day's Hansard record, keyed by `(jurisdiction, hansard_id)` where
/// `hansard_id` is `{parliament}-{session}-{number}`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Debate {
    pub id: Uuid,
    pub jurisdiction: String,
    pub hansard_id: String,
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub debate_date: NaiveDate,
    /// "house" or "senate"
    pub chamber: String,
    /// e.g. "routine", "emergency", "take_note"
    pub debate_type: Option<String>,
    pub topic_en: Option<String>,
    pub topic_fr: Option<String>,
    pub search_vector: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Debate {
    #[must_use]
    pub fn new(jurisdiction: String, parliament: i16, session: i16, number: i32, debate_date: NaiveDate, chamber: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            jurisdiction,
            hansard_id: format!("{parliament}-{session}-{number}"),
            parliament,
            session,
            number,
            debate_date,
            chamber,
            debate_type: None,
            topic_en: None,
            topic_fr: None,
            search_vector: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single attributed remark within a debate, keyed by `(debate_id, sequence)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Speech {
    pub id: Uuid,
    pub debate_id: Uuid,
    pub sequence: i32,
    /// Null when the speaker could not be resolved to a known politician
    pub politician_id: Option<Uuid>,
    pub speaker_name: String,
    pub role: Option<String>,
    /// "en" or "fr" - the language the remark was delivered in
    pub language: String,
    pub text_en: Option<String>,
    pub text_fr: Option<String>,
    pub spoken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Speech {
    #[must_use]
    pub fn new(debate_id: Uuid, sequence: i32, speaker_name: String, language: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            debate_id,
            sequence,
            politician_id: None,
            speaker_name,
            role: None,
            language,
            text_en: None,
            text_fr: None,
            spoken_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub const fn is_attributed(&self) -> bool {
        self.politician_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hansard_id_matches_natural_key_format() {
        let d = Debate::new("ca-federal".into(), 44, 1, 55, NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(), "house".into());
        assert_eq!(d.hansard_id, "44-1-55");
    }
}
