//! Debate (Hansard) catalogue adapter, including the per-debate speech expansion.

use camparl_core::{Debate, Speech};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::bilingual::Bilingual;
use crate::catalogue::CatalogueClient;
use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueDebateDto {
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub debate_date: NaiveDate,
    pub chamber: String,
    pub debate_type: Option<String>,
    pub topic: Bilingual,
}

impl CatalogueDebateDto {
    #[must_use]
    pub fn into_domain(self, jurisdiction: &str) -> Debate {
        let mut debate = Debate::new(jurisdiction.to_string(), self.parliament, self.session, self.number, self.debate_date, self.chamber);
        debate.debate_type = self.debate_type;
        debate.topic_en = self.topic.en;
        debate.topic_fr = self.topic.fr;
        debate
    }
}

/// A single attributed remark as reported by the source. Natural-keyed by the
/// speaker's source politician id, resolved to a `Uuid` by the integration
/// service rather than here.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueSpeechDto {
    pub sequence: i32,
    pub politician_id: Option<String>,
    pub speaker_name: String,
    pub role: Option<String>,
    pub language: String,
    pub text: Bilingual,
    pub spoken_at: Option<DateTime<Utc>>,
}

impl CatalogueSpeechDto {
    #[must_use]
    pub fn into_domain(self, debate_id: Uuid) -> Speech {
        let mut speech = Speech::new(debate_id, self.sequence, self.speaker_name, self.language);
        speech.role = self.role;
        speech.text_en = self.text.en;
        speech.text_fr = self.text.fr;
        speech.spoken_at = self.spoken_at;
        speech
    }
}

/// # Errors
/// Returns `AdapterError` if the request fails or the page cannot be parsed.
pub async fn fetch_debates_page(
    client: &impl CatalogueClient,
    jurisdiction: &str,
    page: PageRequest,
) -> Result<PagedResponse<Debate>, AdapterError> {
    let raw: PagedResponse<CatalogueDebateDto> = client.list_page("debates", page).await?;
    Ok(PagedResponse {
        items: raw.items.into_iter().map(|dto| dto.into_domain(jurisdiction)).collect(),
        total: raw.total,
        provenance: raw.provenance,
    })
}

/// Fetches every attributed remark for one sitting day.
///
/// # Errors
/// Returns `AdapterError` if the request fails or the response cannot be parsed.
pub async fn fetch_speeches(client: &impl CatalogueClient, hansard_id: &str) -> Result<Vec<CatalogueSpeechDto>, AdapterError> {
    client.detail("debates", &format!("{hansard_id}/speeches")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_carries_bilingual_text_into_domain() {
        let dto = CatalogueSpeechDto {
            sequence: 1,
            politician_id: Some("123".into()),
            speaker_name: "Jane Doe".into(),
            role: Some("Speaker".into()),
            language: "en".into(),
            text: Bilingual {
                en: Some("Order.".into()),
                fr: None,
            },
            spoken_at: None,
        };
        let speech = dto.into_domain(Uuid::now_v7());
        assert_eq!(speech.text_en.as_deref(), Some("Order."));
        assert!(!speech.is_attributed());
    }
}
