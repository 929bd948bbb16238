//! Health check endpoint

use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::AppState;
use crate::models::HealthResponse;

/// Reports process liveness plus a live database connectivity check. Does
/// not page through the scheduler or adapters - those degrade gracefully
/// and surface through `fetch_logs`, not through this endpoint.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = if sqlx::query("SELECT 1").execute(state.db.pool()).await.is_ok() { "up" } else { "down" };
    Json(HealthResponse { status: "ok", database })
}
