//! Debate list/detail and speech list endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::jurisdiction;
use crate::models::{DebateDetailParams, DebateListParams, DebateResponse, Page, SpeechListParams, SpeechResponse, clamp_limit, clamp_offset};

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/debates",
    params(("jurisdiction" = String, Path), DebateListParams),
    responses((status = 200, description = "Paginated debate list"))
)]
pub async fn list_debates(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<DebateListParams>,
) -> Result<Json<Page<DebateResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (debates, total) = state
        .db
        .debates()
        .list(jur.as_str(), params.parliament, params.session, limit, offset)
        .await?;

    let items = debates.into_iter().map(DebateResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/debates/{natural_id}",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path), DebateDetailParams),
    responses(
        (status = 200, description = "Debate detail"),
        (status = 404, description = "Unknown debate")
    )
)]
pub async fn get_debate(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
    Query(params): Query<DebateDetailParams>,
) -> Result<Json<DebateResponse>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let debate = state
        .db
        .debates()
        .get_by_natural_key(jur.as_str(), &natural_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("debate {natural_id}")))?;

    let mut response = DebateResponse::from(debate.clone());
    if params.include_speeches {
        let (speeches, _total) = state.db.speeches().list_for_debate(debate.id, None, 500, 0).await?;
        response.speeches = Some(speeches.into_iter().map(SpeechResponse::from).collect());
    }
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/debates/{natural_id}/speeches",
    params(("jurisdiction" = String, Path), ("natural_id" = String, Path), SpeechListParams),
    responses(
        (status = 200, description = "Paginated speech list"),
        (status = 404, description = "Unknown debate")
    )
)]
pub async fn list_speeches(
    State(state): State<Arc<AppState>>,
    Path((jur, natural_id)): Path<(String, String)>,
    Query(params): Query<SpeechListParams>,
) -> Result<Json<Page<SpeechResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let debate = state
        .db
        .debates()
        .get_by_natural_key(jur.as_str(), &natural_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("debate {natural_id}")))?;

    let (speeches, total) = state.db.speeches().list_for_debate(debate.id, params.politician_id, limit, offset).await?;

    let items = speeches.into_iter().map(SpeechResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}
