//! Vote (division) list/detail/records endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use camparl_core::VoteResult;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::jurisdiction;
use crate::models::{Page, VoteDetailParams, VoteListParams, VoteRecordListParams, VoteRecordResponse, VoteResponse, clamp_limit, clamp_offset};

fn parse_result(raw: Option<&str>) -> Result<Option<VoteResult>, ApiError> {
    match raw {
        None => Ok(None),
        Some(s) => match s.to_lowercase().as_str() {
            "passed" => Ok(Some(VoteResult::Passed)),
            "defeated" => Ok(Some(VoteResult::Defeated)),
            "tied" => Ok(Some(VoteResult::Tied)),
            other => Err(ApiError::validation_field(format!("unknown vote result '{other}'"), "result")),
        },
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/votes",
    params(("jurisdiction" = String, Path), VoteListParams),
    responses((status = 200, description = "Paginated vote list"))
)]
pub async fn list_votes(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<VoteListParams>,
) -> Result<Json<Page<VoteResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);
    let result = parse_result(params.result.as_deref())?;

    let (votes, total) = state
        .db
        .votes()
        .list(jur.as_str(), params.parliament, params.session, params.bill_id, result, limit, offset)
        .await?;

    let items = votes.into_iter().map(VoteResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/votes/{natural_id}",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path), VoteDetailParams),
    responses(
        (status = 200, description = "Vote detail"),
        (status = 404, description = "Unknown vote")
    )
)]
pub async fn get_vote(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
    Query(params): Query<VoteDetailParams>,
) -> Result<Json<VoteResponse>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let vote = state
        .db
        .votes()
        .get_by_natural_key(jur.as_str(), &natural_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("vote {natural_id}")))?;

    let mut response = VoteResponse::from(vote.clone());
    if params.include_records {
        let (records, _total) = state.db.vote_records().list_for_vote(vote.id, None, 500, 0).await?;
        response.records = Some(records.into_iter().map(VoteRecordResponse::from).collect());
    }
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/votes/{natural_id}/records",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path), VoteRecordListParams),
    responses(
        (status = 200, description = "Paginated vote records"),
        (status = 404, description = "Unknown vote")
    )
)]
pub async fn list_vote_records(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
    Query(params): Query<VoteRecordListParams>,
) -> Result<Json<Page<VoteRecordResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let vote = state
        .db
        .votes()
        .get_by_natural_key(jur.as_str(), &natural_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("vote {natural_id}")))?;

    let (records, total) = state
        .db
        .vote_records()
        .list_for_vote(vote.id, params.position.as_deref(), limit, offset)
        .await?;

    let items = records.into_iter().map(VoteRecordResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}
