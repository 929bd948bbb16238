//! Device-scoped personalization: ignored bills and feed tokens.
//!
//! There are no user accounts - every handler here is keyed entirely by the
//! opaque `X-Anon-Id` header.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use camparl_core::{FeedToken, IgnoredBill};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::extract::anon_id;
use crate::models::{IgnoreBillRequest, IgnoredBillResponse};

fn require_anon_id(headers: &HeaderMap) -> Result<String, ApiError> {
    anon_id(headers).ok_or_else(|| ApiError::validation_field("missing or malformed X-Anon-Id header", "X-Anon-Id"))
}

#[utoipa::path(
    post,
    path = "/api/v1/{jurisdiction}/preferences/ignore",
    responses(
        (status = 200, description = "Bill ignored"),
        (status = 400, description = "Missing X-Anon-Id or unsupported entity_type")
    )
)]
pub async fn ignore_bill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<IgnoreBillRequest>,
) -> Result<Json<IgnoredBillResponse>, ApiError> {
    let device_id = require_anon_id(&headers)?;
    if body.entity_type != "bill" {
        return Err(ApiError::validation_field(
            format!("unsupported entity_type '{}'", body.entity_type),
            "entity_type",
        ));
    }

    let entry = IgnoredBill::new(device_id, body.entity_id);
    state.db.ignored_bills().ignore(&entry).await?;
    Ok(Json(IgnoredBillResponse { bill_id: entry.bill_id, created_at: entry.created_at }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/{jurisdiction}/preferences/ignore",
    responses(
        (status = 204, description = "Bill un-ignored"),
        (status = 400, description = "Missing X-Anon-Id or unsupported entity_type")
    )
)]
pub async fn unignore_bill(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<IgnoreBillRequest>,
) -> Result<axum::http::StatusCode, ApiError> {
    let device_id = require_anon_id(&headers)?;
    if body.entity_type != "bill" {
        return Err(ApiError::validation_field(
            format!("unsupported entity_type '{}'", body.entity_type),
            "entity_type",
        ));
    }

    state.db.ignored_bills().unignore(&device_id, body.entity_id).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/{jurisdiction}/preferences/ignored",
    responses(
        (status = 200, description = "Ignored bill IDs for this device"),
        (status = 400, description = "Missing X-Anon-Id")
    )
)]
pub async fn list_ignored(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Json<Vec<Uuid>>, ApiError> {
    let device_id = require_anon_id(&headers)?;
    let ids = state.db.ignored_bills().ignored_bill_ids(&device_id).await?;
    Ok(Json(ids))
}

#[utoipa::path(
    post,
    path = "/api/v1/{jurisdiction}/preferences/feed-token",
    responses(
        (status = 200, description = "Token created, returned exactly once"),
        (status = 400, description = "Missing X-Anon-Id")
    )
)]
pub async fn create_feed_token(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<crate::models::FeedTokenResponse>, ApiError> {
    let device_id = require_anon_id(&headers)?;
    let raw = format!("{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple());
    let token = FeedToken::new(raw, device_id);
    state.db.feed_tokens().create(&token).await?;
    Ok(Json(crate::models::FeedTokenResponse { token: token.token, created_at: token.created_at }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/{jurisdiction}/preferences/feed-token/{token}",
    params(("jurisdiction" = String, Path), ("token" = String, Path)),
    responses((status = 204, description = "Token revoked"))
)]
pub async fn revoke_feed_token(
    State(state): State<Arc<AppState>>,
    axum::extract::Path((_jur, token)): axum::extract::Path<(String, String)>,
) -> Result<axum::http::StatusCode, ApiError> {
    state.db.feed_tokens().revoke(&token).await?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
