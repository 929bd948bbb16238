//! Bill model - federal legislation tracked from introduction through royal assent

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::LocalizedText;

/// A bill before the House or Senate, keyed by `(jurisdiction, parliament, session, number)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bill {
    pub id: Uuid,
    pub jurisdiction: String,
    pub parliament: i16,
    pub session: i16,
    /// e.g. "C-11", "S-5"
    pub number: String,
    pub title_en: Option<String>,
    pub title_fr: Option<String>,
    pub sponsor_politician_id: Option<Uuid>,
    pub introduced_date: Option<NaiveDate>,
    pub status: String,
    pub royal_assent_date: Option<NaiveDate>,
    pub royal_assent_chapter: Option<String>,
    pub summary_en: Option<String>,
    pub summary_fr: Option<String>,
    pub subject_tags: Vec<String>,
    /// True once a catalogue fetch has contributed to this row. Sticky:
    /// never cleared by a later upsert.
    pub source_primary: bool,
    /// True once an enrichment-source merge has contributed to this row.
    pub source_enrichment: bool,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub last_enriched_at: Option<DateTime<Utc>>,
    pub embedding: Option<pgvector::Vector>,
    /// Maintained by the repository on every upsert, not by application code.
    pub search_vector: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bill {
    #[must_use]
    pub fn new(jurisdiction: String, parliament: i16, session: i16, number: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            jurisdiction,
            parliament,
            session,
            number,
            title_en: None,
            title_fr: None,
            sponsor_politician_id: None,
            introduced_date: None,
            status: "introduced".to_string(),
            royal_assent_date: None,
            royal_assent_chapter: None,
            summary_en: None,
            summary_fr: None,
            subject_tags: Vec::new(),
            source_primary: true,
            source_enrichment: false,
            last_fetched_at: None,
            last_enriched_at: None,
            embedding: None,
            search_vector: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn title(&self) -> LocalizedText {
        LocalizedText::new(self.title_en.clone(), self.title_fr.clone())
    }

    #[must_use]
    pub fn summary(&self) -> LocalizedText {
        LocalizedText::new(self.summary_en.clone(), self.summary_fr.clone())
    }

    /// The natural identifier used in URLs and feed GUIDs, e.g. "44-1-C-11"
    #[must_use]
    pub fn natural_id(&self) -> String {
        format!("{}-{}-{}", self.parliament, self.session, self.number)
    }

    #[must_use]
    pub const fn has_royal_assent(&self) -> bool {
        self.royal_assent_date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_id_format() {
        let bill = Bill::new("ca-federal".into(), 44, 1, "C-11".into());
        assert_eq!(bill.natural_id(), "44-1-C-11");
    }
}
