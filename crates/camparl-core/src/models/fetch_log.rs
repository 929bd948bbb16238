//! Fetch log model - append-only record of every ingestion run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Outcome classification for one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
pub enum FetchStatus {
    Success,
    Partial,
    Failure,
}

impl FetchStatus {
    /// Classifies a run from its persisted/failed record counts, per the
    /// success/partial/failure rule: any persisted record with at least one
    /// failure is partial; zero persisted is failure.
    #[must_use]
    pub const fn classify(succeeded: i32, failed: i32) -> Self {
        match (succeeded > 0, failed > 0) {
            (true, false) => Self::Success,
            (true, true) => Self::Partial,
            (false, _) => Self::Failure,
        }
    }
}

/// One ingestion operation's outcome. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FetchLog {
    pub id: Uuid,
    pub source: String,
    pub status: FetchStatus,
    pub records_attempted: i32,
    pub records_succeeded: i32,
    pub records_failed: i32,
    pub duration_ms: i64,
    pub parameters: serde_json::Value,
    /// First N unique error messages with counts
    pub error_summary: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl FetchLog {
    #[must_use]
    pub fn new(source: String, attempted: i32, succeeded: i32, failed: i32, duration_ms: i64, parameters: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            source,
            status: FetchStatus::classify(succeeded, failed),
            records_attempted: attempted,
            records_succeeded: succeeded,
            records_failed: failed,
            duration_ms,
            parameters,
            error_summary: serde_json::Value::Array(Vec::new()),
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_errors(mut self, error_summary: serde_json::Value) -> Self {
        self.error_summary = error_summary;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_success_partial_failure() {
        assert_eq!(FetchStatus::classify(10, 0), FetchStatus::Success);
        assert_eq!(FetchStatus::classify(8, 2), FetchStatus::Partial);
        assert_eq!(FetchStatus::classify(0, 5), FetchStatus::Failure);
        assert_eq!(FetchStatus::classify(0, 0), FetchStatus::Failure);
    }
}
