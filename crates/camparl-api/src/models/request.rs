//! Query-parameter shapes for list/detail/search endpoints.

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

#[derive(Debug, Deserialize, IntoParams)]
pub struct BillListParams {
    pub parliament: Option<i16>,
    pub session: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct BillSearchParams {
    pub q: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PoliticianListParams {
    pub party: Option<String>,
    pub riding: Option<String>,
    #[serde(default)]
    pub current_only: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VoteListParams {
    pub parliament: Option<i16>,
    pub session: Option<i16>,
    pub bill_id: Option<Uuid>,
    pub result: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VoteDetailParams {
    #[serde(default)]
    pub include_records: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct VoteRecordListParams {
    pub position: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CommitteeListParams {
    pub parliament: Option<i16>,
    pub session: Option<i16>,
    pub chamber: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CommitteeMeetingListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DebateListParams {
    pub parliament: Option<i16>,
    pub session: Option<i16>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct DebateDetailParams {
    #[serde(default)]
    pub include_speeches: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SpeechListParams {
    pub politician_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct CrossSearchParams {
    pub q: String,
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IgnoreBillRequest {
    pub entity_type: String,
    pub entity_id: Uuid,
}
