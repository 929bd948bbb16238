//! Committee list/detail/meetings endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::jurisdiction;
use crate::models::{CommitteeListParams, CommitteeMeetingListParams, CommitteeMeetingResponse, CommitteeResponse, Page, clamp_limit, clamp_offset};

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/committees",
    params(("jurisdiction" = String, Path), CommitteeListParams),
    responses((status = 200, description = "Paginated committee list"))
)]
pub async fn list_committees(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<CommitteeListParams>,
) -> Result<Json<Page<CommitteeResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (committees, total) = state
        .db
        .committees()
        .list(jur.as_str(), params.parliament, params.session, params.chamber.as_deref(), limit, offset)
        .await?;

    let items = committees.into_iter().map(CommitteeResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}

/// The natural key is `(jurisdiction, parliament, session, slug)`; the URL
/// carries it as `{parliament}-{session}-{slug}` to match the GUID/feed
/// convention used elsewhere.
fn parse_committee_natural_id(natural_id: &str) -> Result<(i16, i16, String), ApiError> {
    let mut parts = natural_id.splitn(3, '-');
    let parliament = parts.next().and_then(|p| p.parse().ok());
    let session = parts.next().and_then(|s| s.parse().ok());
    let slug = parts.next().map(str::to_string);
    match (parliament, session, slug) {
        (Some(p), Some(s), Some(slug)) if !slug.is_empty() => Ok((p, s, slug)),
        _ => Err(ApiError::validation_field(
            format!("expected '{{parliament}}-{{session}}-{{slug}}', got '{natural_id}'"),
            "natural_id",
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/committees/{natural_id}",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path)),
    responses(
        (status = 200, description = "Committee detail"),
        (status = 404, description = "Unknown committee")
    )
)]
pub async fn get_committee(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
) -> Result<Json<CommitteeResponse>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let (parliament, session, slug) = parse_committee_natural_id(&natural_id)?;

    let committee = state
        .db
        .committees()
        .get_by_natural_key(jur.as_str(), parliament, session, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("committee {natural_id}")))?;
    Ok(Json(committee.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/committees/{natural_id}/meetings",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path), CommitteeMeetingListParams),
    responses(
        (status = 200, description = "Paginated meeting list"),
        (status = 404, description = "Unknown committee")
    )
)]
pub async fn list_committee_meetings(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
    Query(params): Query<CommitteeMeetingListParams>,
) -> Result<Json<Page<CommitteeMeetingResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let (parliament, session, slug) = parse_committee_natural_id(&natural_id)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let committee = state
        .db
        .committees()
        .get_by_natural_key(jur.as_str(), parliament, session, &slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("committee {natural_id}")))?;

    let (meetings, total) = state.db.committee_meetings().list_for_committee(committee.id, limit, offset).await?;

    let items = meetings.into_iter().map(CommitteeMeetingResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}
