//! API key authentication for `/api/v1/*`, generalized from a single
//! bearer-token check to a full lookup-and-rate-limit flow per key.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::AppState;
use crate::error::ApiError;

fn hash_key(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}

pub async fn require_api_key(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    match authenticate(&state, &request).await {
        Ok(outcome) => {
            let mut response = next.run(request).await;
            apply_headers(&mut response, outcome);
            response
        }
        Err(err) => err.into_response(),
    }
}

struct AuthOutcome {
    limit: u32,
    remaining: u32,
    reset_secs: i64,
}

async fn authenticate(state: &AppState, request: &Request) -> Result<AuthOutcome, ApiError> {
    let raw_key = request
        .headers()
        .get("X-API-Key")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Authentication {
            message: "missing X-API-Key header".to_string(),
        })?;

    let key_hash = hash_key(raw_key);
    let key = state
        .db
        .api_keys()
        .get_by_hash(&key_hash)
        .await?
        .ok_or_else(|| ApiError::Authentication {
            message: "invalid API key".to_string(),
        })?;

    if !key.is_usable(Utc::now()) {
        return Err(ApiError::Authentication {
            message: "API key is inactive or expired".to_string(),
        });
    }

    let limiter = state
        .key_limiters
        .entry(key.id)
        .or_insert_with(|| Arc::new(crate::ratelimit::HourlyLimiter::new(key.requests_per_hour.max(1) as u32)))
        .clone();

    let headers = limiter.check().map_err(|retry_after_secs| ApiError::RateLimited { retry_after_secs })?;

    // Usage bookkeeping is advisory per the auth contract; a failure here
    // must not block the request it is accounting for.
    if let Err(err) = state.db.api_keys().record_usage(key.id).await {
        tracing::warn!(error = %err, key_id = %key.id, "failed to record api key usage");
    }

    let reset_secs = (headers.reset - Utc::now()).num_seconds().max(0);
    Ok(AuthOutcome {
        limit: headers.limit,
        remaining: headers.remaining,
        reset_secs,
    })
}

fn apply_headers(response: &mut Response, outcome: AuthOutcome) {
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&outcome.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&outcome.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = HeaderValue::from_str(&outcome.reset_secs.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_key_is_deterministic() {
        assert_eq!(hash_key("raw-key"), hash_key("raw-key"));
    }

    #[test]
    fn hash_key_distinguishes_inputs() {
        assert_ne!(hash_key("raw-key-a"), hash_key("raw-key-b"));
    }
}
