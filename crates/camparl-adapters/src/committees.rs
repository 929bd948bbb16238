//! Committee catalogue adapter, including the per-committee meeting expansion.

use camparl_core::{Committee, CommitteeMeeting};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::bilingual::Bilingual;
use crate::catalogue::CatalogueClient;
use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueCommitteeDto {
    pub slug: String,
    pub name: Bilingual,
    pub acronym: Option<String>,
    pub chamber: String,
}

impl CatalogueCommitteeDto {
    #[must_use]
    pub fn into_domain(self, jurisdiction: &str, parliament: i16, session: i16) -> Committee {
        let name_en = self.name.en.unwrap_or_else(|| self.slug.clone());
        let mut committee = Committee::new(jurisdiction.to_string(), parliament, session, self.slug, name_en, self.chamber);
        committee.name_fr = self.name.fr;
        committee.acronym = self.acronym;
        committee
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueMeetingDto {
    pub meeting_number: i32,
    pub meeting_date: NaiveDate,
    pub meeting_time: Option<NaiveTime>,
    pub title: Bilingual,
    pub meeting_type: Option<String>,
    pub room: Option<String>,
    #[serde(default)]
    pub witnesses: serde_json::Value,
    #[serde(default)]
    pub documents: serde_json::Value,
}

impl CatalogueMeetingDto {
    #[must_use]
    pub fn into_domain(self, committee_id: Uuid, parliament: i16, session: i16) -> CommitteeMeeting {
        let mut meeting = CommitteeMeeting::new(committee_id, self.meeting_number, parliament, session, self.meeting_date);
        meeting.meeting_time = self.meeting_time;
        meeting.title_en = self.title.en;
        meeting.title_fr = self.title.fr;
        meeting.meeting_type = self.meeting_type;
        meeting.room = self.room;
        if self.witnesses.is_array() {
            meeting.witnesses = self.witnesses;
        }
        if self.documents.is_array() {
            meeting.documents = self.documents;
        }
        meeting
    }
}

/// # Errors
/// Returns `AdapterError` if the request fails or the page cannot be parsed.
pub async fn fetch_committees_page(
    client: &impl CatalogueClient,
    jurisdiction: &str,
    parliament: i16,
    session: i16,
    page: PageRequest,
) -> Result<PagedResponse<Committee>, AdapterError> {
    let raw: PagedResponse<CatalogueCommitteeDto> = client.list_page("committees", page).await?;
    Ok(PagedResponse {
        items: raw
            .items
            .into_iter()
            .map(|dto| dto.into_domain(jurisdiction, parliament, session))
            .collect(),
        total: raw.total,
        provenance: raw.provenance,
    })
}

/// Fetches every scheduled meeting for one committee in a given parliament/session.
///
/// # Errors
/// Returns `AdapterError` if the request fails or the response cannot be parsed.
pub async fn fetch_meetings(
    client: &impl CatalogueClient,
    committee_slug: &str,
    parliament: i16,
    session: i16,
) -> Result<Vec<CatalogueMeetingDto>, AdapterError> {
    client
        .detail("committees", &format!("{committee_slug}/{parliament}-{session}/meetings"))
        .await
}
