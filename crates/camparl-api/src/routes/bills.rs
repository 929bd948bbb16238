//! Bill list/detail/search endpoints

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::{ignored_bill_ids, jurisdiction};
use crate::models::{BillListParams, BillResponse, BillSearchParams, Page, SearchHitResponse, clamp_limit, clamp_offset};

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/bills",
    params(("jurisdiction" = String, Path), BillListParams),
    responses((status = 200, description = "Paginated bill list"))
)]
pub async fn list_bills(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<BillListParams>,
    headers: HeaderMap,
) -> Result<Json<Page<BillResponse>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);
    let exclude_ids = ignored_bill_ids(&state.db, &headers).await?;

    let (bills, total) = state
        .db
        .bills()
        .list(jur.as_str(), params.parliament, params.session, &exclude_ids, limit, offset)
        .await?;

    let items = bills.into_iter().map(BillResponse::from).collect();
    Ok(Json(Page::new(items, total, limit, offset)))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/bills/{id}",
    params(("jurisdiction" = String, Path), ("id" = uuid::Uuid, Path)),
    responses(
        (status = 200, description = "Bill detail", body = BillResponse),
        (status = 404, description = "Unknown bill")
    )
)]
pub async fn get_bill(
    State(state): State<Arc<AppState>>,
    Path((_jur, id)): Path<(String, uuid::Uuid)>,
) -> Result<Json<BillResponse>, ApiError> {
    let bill = state
        .db
        .bills()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("bill {id}")))?;
    Ok(Json(bill.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/bills/search",
    params(("jurisdiction" = String, Path), BillSearchParams),
    responses((status = 200, description = "Bill search results"))
)]
pub async fn search_bills(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<BillSearchParams>,
    headers: HeaderMap,
) -> Result<Json<Vec<SearchHitResponse<BillResponse>>>, ApiError> {
    let jur = jurisdiction(&jur)?;
    if params.q.trim().is_empty() {
        return Err(ApiError::validation_field("query must not be empty", "q"));
    }
    let limit = params.limit.unwrap_or(camparl_search::DEFAULT_LIMIT);
    let offset = clamp_offset(params.offset);
    let exclude_ids = ignored_bill_ids(&state.db, &headers).await?;

    let search = camparl_search::SearchService::new(&state.db);
    let hits = search
        .search_bills(jur.as_str(), &params.q, None, &exclude_ids, limit, offset)
        .await?;

    let results = hits
        .into_iter()
        .map(|hit| SearchHitResponse {
            item: BillResponse::from(hit.item),
            score: hit.score,
            snippet: hit.snippet,
        })
        .collect();
    Ok(Json(results))
}
