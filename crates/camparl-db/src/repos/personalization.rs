//! Ignored bill and personalized feed token repositories

use crate::DbError;
use camparl_core::{FeedToken, IgnoredBill};
use sqlx::PgPool;
use uuid::Uuid;

pub struct IgnoredBillRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> IgnoredBillRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent insert - ignoring an already-ignored bill is a no-op.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn ignore(&self, entry: &IgnoredBill) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO ignored_bills (device_id, bill_id, created_at) VALUES ($1, $2, $3) \
             ON CONFLICT (device_id, bill_id) DO NOTHING",
        )
        .bind(&entry.device_id)
        .bind(entry.bill_id)
        .bind(entry.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the delete fails
    pub async fn unignore(&self, device_id: &str, bill_id: Uuid) -> Result<(), DbError> {
        sqlx::query("DELETE FROM ignored_bills WHERE device_id = $1 AND bill_id = $2")
            .bind(device_id)
            .bind(bill_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn ignored_bill_ids(&self, device_id: &str) -> Result<Vec<Uuid>, DbError> {
        let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT bill_id FROM ignored_bills WHERE device_id = $1")
            .bind(device_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}

pub struct FeedTokenRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FeedTokenRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn create(&self, token: &FeedToken) -> Result<(), DbError> {
        sqlx::query(
            "INSERT INTO feed_tokens (token, device_id, created_at, last_accessed_at, access_count) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&token.token)
        .bind(&token.device_id)
        .bind(token.created_at)
        .bind(token.last_accessed_at)
        .bind(token.access_count)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Resolves a token to its owning device, bumping access bookkeeping.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn resolve(&self, token: &str) -> Result<Option<FeedToken>, DbError> {
        let resolved = sqlx::query_as::<_, FeedToken>(
            "UPDATE feed_tokens SET last_accessed_at = NOW(), access_count = access_count + 1 \
             WHERE token = $1 RETURNING *",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;
        Ok(resolved)
    }

    /// # Errors
    /// Returns `DbError` if the delete fails
    pub async fn revoke(&self, token: &str) -> Result<(), DbError> {
        sqlx::query("DELETE FROM feed_tokens WHERE token = $1")
            .bind(token)
            .execute(self.pool)
            .await?;
        Ok(())
    }
}
