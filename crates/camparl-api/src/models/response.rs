//! Response DTOs for API endpoints. Each wraps a core model rather than
//! re-deriving `Serialize` on it directly, so wire shape can diverge from
//! storage shape (e.g. folding bilingual columns into a nested object).

use camparl_core::{Bill, Committee, CommitteeMeeting, Debate, Politician, Speech, Vote, VoteRecord};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
pub struct Localized {
    pub en: Option<String>,
    pub fr: Option<String>,
}

impl Localized {
    fn new(en: Option<String>, fr: Option<String>) -> Self {
        Self { en, fr }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillResponse {
    pub id: Uuid,
    pub jurisdiction: String,
    pub parliament: i16,
    pub session: i16,
    pub number: String,
    pub natural_id: String,
    pub title: Localized,
    pub sponsor_politician_id: Option<Uuid>,
    pub introduced_date: Option<NaiveDate>,
    pub status: String,
    pub royal_assent_date: Option<NaiveDate>,
    pub royal_assent_chapter: Option<String>,
    pub summary: Localized,
    pub subject_tags: Vec<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub last_enriched_at: Option<DateTime<Utc>>,
    pub has_embedding: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Bill> for BillResponse {
    fn from(bill: Bill) -> Self {
        let natural_id = bill.natural_id();
        let has_embedding = bill.embedding.is_some();
        Self {
            id: bill.id,
            jurisdiction: bill.jurisdiction,
            parliament: bill.parliament,
            session: bill.session,
            number: bill.number,
            natural_id,
            title: Localized::new(bill.title_en, bill.title_fr),
            sponsor_politician_id: bill.sponsor_politician_id,
            introduced_date: bill.introduced_date,
            status: bill.status,
            royal_assent_date: bill.royal_assent_date,
            royal_assent_chapter: bill.royal_assent_chapter,
            summary: Localized::new(bill.summary_en, bill.summary_fr),
            subject_tags: bill.subject_tags,
            last_fetched_at: bill.last_fetched_at,
            last_enriched_at: bill.last_enriched_at,
            has_embedding,
            created_at: bill.created_at,
            updated_at: bill.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PoliticianResponse {
    pub id: Uuid,
    pub jurisdiction: String,
    pub politician_id: String,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub current_party: Option<String>,
    pub current_riding: Option<String>,
    pub photo_url: Option<String>,
    pub source_url: Option<String>,
    pub memberships: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Politician> for PoliticianResponse {
    fn from(p: Politician) -> Self {
        let display_name = p.display_name();
        Self {
            id: p.id,
            jurisdiction: p.jurisdiction,
            politician_id: p.politician_id,
            first_name: p.first_name,
            last_name: p.last_name,
            display_name,
            current_party: p.current_party,
            current_riding: p.current_riding,
            photo_url: p.photo_url,
            source_url: p.source_url,
            memberships: p.memberships,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteResponse {
    pub id: Uuid,
    pub jurisdiction: String,
    pub vote_id: String,
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub vote_date: NaiveDate,
    pub chamber: String,
    pub description: Localized,
    pub result: String,
    pub yea_count: i32,
    pub nay_count: i32,
    pub abstain_count: i32,
    pub bill_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<VoteRecordResponse>>,
}

impl From<Vote> for VoteResponse {
    fn from(v: Vote) -> Self {
        Self {
            id: v.id,
            jurisdiction: v.jurisdiction,
            vote_id: v.vote_id,
            parliament: v.parliament,
            session: v.session,
            number: v.number,
            vote_date: v.vote_date,
            chamber: v.chamber,
            description: Localized::new(v.description_en, v.description_fr),
            result: v.result.as_str().to_string(),
            yea_count: v.yea_count,
            nay_count: v.nay_count,
            abstain_count: v.abstain_count,
            bill_id: v.bill_id,
            source_url: v.source_url,
            created_at: v.created_at,
            updated_at: v.updated_at,
            records: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VoteRecordResponse {
    pub id: Uuid,
    pub vote_id: Uuid,
    pub politician_id: Uuid,
    pub position: String,
    pub raw_position: Option<String>,
    pub party_at_vote: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<VoteRecord> for VoteRecordResponse {
    fn from(r: VoteRecord) -> Self {
        Self {
            id: r.id,
            vote_id: r.vote_id,
            politician_id: r.politician_id,
            position: r.position.as_str().to_string(),
            raw_position: r.raw_position,
            party_at_vote: r.party_at_vote,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommitteeResponse {
    pub id: Uuid,
    pub jurisdiction: String,
    pub parliament: i16,
    pub session: i16,
    pub slug: String,
    pub natural_id: String,
    pub name: Localized,
    pub acronym: Option<String>,
    pub chamber: String,
    pub parent_committee_id: Option<Uuid>,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Committee> for CommitteeResponse {
    fn from(c: Committee) -> Self {
        let natural_id = format!("{}-{}-{}", c.parliament, c.session, c.slug);
        Self {
            id: c.id,
            jurisdiction: c.jurisdiction,
            parliament: c.parliament,
            session: c.session,
            slug: c.slug,
            natural_id,
            name: Localized::new(Some(c.name_en), c.name_fr),
            acronym: c.acronym,
            chamber: c.chamber,
            parent_committee_id: c.parent_committee_id,
            source_url: c.source_url,
            created_at: c.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CommitteeMeetingResponse {
    pub id: Uuid,
    pub committee_id: Uuid,
    pub meeting_number: i32,
    pub parliament: i16,
    pub session: i16,
    pub meeting_date: NaiveDate,
    pub meeting_time: Option<chrono::NaiveTime>,
    pub title: Localized,
    pub meeting_type: Option<String>,
    pub room: Option<String>,
    pub witnesses: serde_json::Value,
    pub documents: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommitteeMeeting> for CommitteeMeetingResponse {
    fn from(m: CommitteeMeeting) -> Self {
        Self {
            id: m.id,
            committee_id: m.committee_id,
            meeting_number: m.meeting_number,
            parliament: m.parliament,
            session: m.session,
            meeting_date: m.meeting_date,
            meeting_time: m.meeting_time,
            title: Localized::new(m.title_en, m.title_fr),
            meeting_type: m.meeting_type,
            room: m.room,
            witnesses: m.witnesses,
            documents: m.documents,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DebateResponse {
    pub id: Uuid,
    pub jurisdiction: String,
    pub hansard_id: String,
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub debate_date: NaiveDate,
    pub chamber: String,
    pub debate_type: Option<String>,
    pub topic: Localized,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speeches: Option<Vec<SpeechResponse>>,
}

impl From<Debate> for DebateResponse {
    fn from(d: Debate) -> Self {
        Self {
            id: d.id,
            jurisdiction: d.jurisdiction,
            hansard_id: d.hansard_id,
            parliament: d.parliament,
            session: d.session,
            number: d.number,
            debate_date: d.debate_date,
            chamber: d.chamber,
            debate_type: d.debate_type,
            topic: Localized::new(d.topic_en, d.topic_fr),
            created_at: d.created_at,
            updated_at: d.updated_at,
            speeches: None,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SpeechResponse {
    pub id: Uuid,
    pub debate_id: Uuid,
    pub sequence: i32,
    pub politician_id: Option<Uuid>,
    pub speaker_name: String,
    pub role: Option<String>,
    pub language: String,
    pub text: Localized,
    pub spoken_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Speech> for SpeechResponse {
    fn from(s: Speech) -> Self {
        Self {
            id: s.id,
            debate_id: s.debate_id,
            sequence: s.sequence,
            politician_id: s.politician_id,
            speaker_name: s.speaker_name,
            role: s.role,
            language: s.language,
            text: Localized::new(s.text_en, s.text_fr),
            spoken_at: s.spoken_at,
            created_at: s.created_at,
        }
    }
}

/// One hit in a search result set, carrying the highlighted snippet
/// alongside whichever entity matched. Not `ToSchema` - utoipa can't derive
/// a schema for a bare generic without per-instantiation aliases, and the
/// OpenAPI doc composes concrete schemas for bills/debates/speeches instead.
#[derive(Debug, Serialize)]
pub struct SearchHitResponse<T> {
    #[serde(flatten)]
    pub item: T,
    pub score: f32,
    pub snippet: String,
}

/// Not `ToSchema` for the same reason as `SearchHitResponse`: it embeds that
/// generic directly.
#[derive(Debug, Serialize)]
pub struct CrossSearchResponse {
    pub query: String,
    pub bills: Vec<SearchHitResponse<BillResponse>>,
    pub debates: Vec<SearchHitResponse<DebateResponse>>,
    pub speeches: Vec<SearchHitResponse<SpeechResponse>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IgnoredBillResponse {
    pub bill_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeedTokenResponse {
    pub token: String,
    pub created_at: DateTime<Utc>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}
