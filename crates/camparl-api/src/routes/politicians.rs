//! Politician list/detail endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};

use crate::AppState;
use crate::error::ApiError;
use crate::extract::jurisdiction;
use crate::models::{Page, PoliticianListParams, PoliticianResponse, clamp_limit, clamp_offset};

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/politicians",
    params(("jurisdiction" = String, Path), PoliticianListParams),
    responses((status = 200, description = "Paginated politician list"))
)]
pub async fn list_politicians(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<PoliticianListParams>,
) -> Result<Json<Page<PoliticianResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (politicians, total) = state
        .db
        .politicians()
        .list(
            jur.as_str(),
            params.party.as_deref(),
            params.riding.as_deref(),
            params.current_only,
            limit,
            offset,
        )
        .await?;

    let items = politicians.into_iter().map(PoliticianResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/politicians/{id}",
    params(("jurisdiction" = String, Path), ("id" = uuid::Uuid, Path)),
    responses(
        (status = 200, description = "Politician detail"),
        (status = 404, description = "Unknown politician")
    )
)]
pub async fn get_politician(
    State(state): State<Arc<AppState>>,
    Path((_jur, id)): Path<(String, uuid::Uuid)>,
) -> Result<Json<PoliticianResponse>, ApiError> {
    let politician = state
        .db
        .politicians()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("politician {id}")))?;
    Ok(Json(politician.into()))
}
