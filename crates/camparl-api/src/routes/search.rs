//! Cross-entity keyword search over bills, debates, and speeches

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use camparl_search::SearchService;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::{ignored_bill_ids, jurisdiction};
use crate::models::{BillResponse, CrossSearchParams, CrossSearchResponse, DebateResponse, SearchHitResponse, SpeechResponse, clamp_offset};

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/search",
    params(("jurisdiction" = String, Path), CrossSearchParams),
    responses((status = 200, description = "Cross-entity search results"))
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Path(jur): Path<String>,
    Query(params): Query<CrossSearchParams>,
    headers: HeaderMap,
) -> Result<Json<CrossSearchResponse>, ApiError> {
    let jur = jurisdiction(&jur)?;
    if params.q.trim().is_empty() {
        return Err(ApiError::validation_field("query must not be empty", "q"));
    }
    let limit = params.limit.unwrap_or(camparl_search::DEFAULT_LIMIT);
    let offset = clamp_offset(params.offset);
    let search = SearchService::new(&state.db);

    let want = |kind: &str| params.entity_type.as_deref().is_none_or(|t| t == kind);

    let bills = if want("bill") {
        let exclude_ids = ignored_bill_ids(&state.db, &headers).await?;
        search
            .search_bills(jur.as_str(), &params.q, None, &exclude_ids, limit, offset)
            .await?
            .into_iter()
            .map(|hit| SearchHitResponse {
                item: BillResponse::from(hit.item),
                score: hit.score,
                snippet: hit.snippet,
            })
            .collect()
    } else {
        Vec::new()
    };

    let debates = if want("debate") {
        search
            .search_debates(jur.as_str(), &params.q, limit, offset)
            .await?
            .into_iter()
            .map(|hit| SearchHitResponse {
                item: DebateResponse::from(hit.item),
                score: hit.score,
                snippet: hit.snippet,
            })
            .collect()
    } else {
        Vec::new()
    };

    let speeches = if want("speech") {
        search
            .search_speeches(&params.q, limit, offset)
            .await?
            .into_iter()
            .map(|hit| SearchHitResponse {
                item: SpeechResponse::from(hit.item),
                score: hit.score,
                snippet: hit.snippet,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(CrossSearchResponse { query: params.q, bills, debates, speeches }))
}
