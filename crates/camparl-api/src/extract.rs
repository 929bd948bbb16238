//! Small header/path helpers shared across route handlers.

use axum::http::HeaderMap;
use camparl_core::Jurisdiction;
use camparl_db::Database;
use uuid::Uuid;

use crate::error::ApiError;

/// Parses and validates the optional `X-Anon-Id` device header (32-128
/// chars, alphanumeric plus `-`). An out-of-contract header is treated as
/// absent rather than rejected, since personalization is opt-in sugar, not
/// a required credential.
#[must_use]
pub fn anon_id(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get("X-Anon-Id")?.to_str().ok()?;
    let valid = (32..=128).contains(&raw.len()) && raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    valid.then(|| raw.to_string())
}

/// Returns the bill IDs a device has ignored, or an empty set when no
/// device header is present.
///
/// # Errors
/// Returns `ApiError` if the lookup fails.
pub async fn ignored_bill_ids(db: &Database, headers: &HeaderMap) -> Result<Vec<Uuid>, ApiError> {
    match anon_id(headers) {
        Some(device_id) => Ok(db.ignored_bills().ignored_bill_ids(&device_id).await?),
        None => Ok(Vec::new()),
    }
}

/// Validates a jurisdiction path segment.
///
/// # Errors
/// Returns `ApiError::Validation` if the segment isn't a valid slug.
pub fn jurisdiction(raw: &str) -> Result<Jurisdiction, ApiError> {
    Jurisdiction::new(raw).map_err(|e| ApiError::validation_field(e.to_string(), "jurisdiction"))
}
