//! Adapter error classification - transient (retried) vs. terminal (per-record)

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    /// Network timeout, connection reset, 5xx, or 429 - retried with backoff.
    #[error("transient upstream error: {0}")]
    Transient(String),

    /// 4xx (other than 429) or unparseable payload for one record - does not
    /// abort the batch it belongs to.
    #[error("terminal upstream error: {0}")]
    Terminal(String),

    /// A rate-limit token could not be acquired within the caller's timeout.
    #[error("rate limit wait exceeded {0:?}")]
    RateLimitTimeout(std::time::Duration),
}

impl AdapterError {
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_) | Self::RateLimitTimeout(_))
    }

    pub fn from_status(status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        if status.is_server_error() || status.as_u16() == 429 {
            Self::Transient(format!("{status}: {}", body.into()))
        } else {
            Self::Terminal(format!("{status}: {}", body.into()))
        }
    }
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Transient(err.to_string())
        } else {
            Self::Terminal(err.to_string())
        }
    }
}
