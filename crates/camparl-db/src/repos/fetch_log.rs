//! Fetch log repository - append-only ingestion history

use crate::DbError;
use camparl_core::FetchLog;
use sqlx::PgPool;

pub struct FetchLogRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FetchLogRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn record(&self, log: &FetchLog) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO fetch_logs (id, source, status, records_attempted, records_succeeded,
                                     records_failed, duration_ms, parameters, error_summary, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ",
        )
        .bind(log.id)
        .bind(&log.source)
        .bind(log.status)
        .bind(log.records_attempted)
        .bind(log.records_succeeded)
        .bind(log.records_failed)
        .bind(log.duration_ms)
        .bind(&log.parameters)
        .bind(&log.error_summary)
        .bind(log.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn recent(&self, source: Option<&str>, limit: i64) -> Result<Vec<FetchLog>, DbError> {
        let logs = sqlx::query_as::<_, FetchLog>(
            "SELECT * FROM fetch_logs WHERE ($1::TEXT IS NULL OR source = $1) ORDER BY created_at DESC LIMIT $2",
        )
        .bind(source)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(logs)
    }
}
