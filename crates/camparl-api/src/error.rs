//! API error types

use std::fmt;

use axum::Json;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug)]
pub enum ApiError {
    Validation { message: String, field: Option<String> },
    Authentication { message: String },
    Authorization { message: String },
    NotFound { message: String },
    Conflict { message: String },
    RateLimited { retry_after_secs: u64 },
    Internal(String),
    DependencyUnavailable { message: String },
}

impl ApiError {
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    #[must_use]
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound { message: message.into() }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { message, .. } => write!(f, "validation error: {message}"),
            Self::Authentication { message } => write!(f, "authentication error: {message}"),
            Self::Authorization { message } => write!(f, "authorization error: {message}"),
            Self::NotFound { message } => write!(f, "not found: {message}"),
            Self::Conflict { message } => write!(f, "conflict: {message}"),
            Self::RateLimited { retry_after_secs } => write!(f, "rate limited, retry after {retry_after_secs}s"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
            Self::DependencyUnavailable { message } => write!(f, "dependency unavailable: {message}"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, field, retry_after) = match self {
            Self::Validation { message, field } => (StatusCode::BAD_REQUEST, "validation_error", message, field, None),
            Self::Authentication { message } => (StatusCode::UNAUTHORIZED, "authentication_error", message, None, None),
            Self::Authorization { message } => (StatusCode::FORBIDDEN, "authorization_error", message, None, None),
            Self::NotFound { message } => (StatusCode::NOT_FOUND, "not_found", message, None, None),
            Self::Conflict { message } => (StatusCode::CONFLICT, "conflict", message, None, None),
            Self::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "rate limit exceeded".to_string(),
                None,
                Some(retry_after_secs),
            ),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "operation failed".to_string(), None, None)
            }
            Self::DependencyUnavailable { message } => {
                tracing::warn!(%message, "dependency unavailable");
                (StatusCode::SERVICE_UNAVAILABLE, "dependency_unavailable", message, None, None)
            }
        };

        let body = ErrorResponse { error: ErrorBody { code, message, field } };
        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert("Retry-After", value);
            }
        }
        response
    }
}

impl From<color_eyre::Report> for ApiError {
    fn from(err: color_eyre::Report) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<camparl_db::DbError> for ApiError {
    fn from(err: camparl_db::DbError) -> Self {
        match err {
            camparl_db::DbError::NotFound(message) => Self::NotFound { message },
            camparl_db::DbError::Duplicate(message) => Self::Conflict { message },
            camparl_db::DbError::InvalidOperation(message) => Self::Validation { message, field: None },
            camparl_db::DbError::Sqlx(e) => Self::Internal(e.to_string()),
        }
    }
}

impl From<camparl_search::SearchError> for ApiError {
    fn from(err: camparl_search::SearchError) -> Self {
        Self::Internal(err.to_string())
    }
}
