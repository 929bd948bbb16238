//! API key repository

use crate::DbError;
use camparl_core::ApiKey;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ApiKeyRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ApiKeyRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn create(&self, key: &ApiKey) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO api_keys (id, name, key_hash, is_active, requests_per_hour, expires_at,
                                   last_used_at, request_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(key.id)
        .bind(&key.name)
        .bind(&key.key_hash)
        .bind(key.is_active)
        .bind(key.requests_per_hour)
        .bind(key.expires_at)
        .bind(key.last_used_at)
        .bind(key.request_count)
        .bind(key.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_hash(&self, key_hash: &str) -> Result<Option<ApiKey>, DbError> {
        let key = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE key_hash = $1")
            .bind(key_hash)
            .fetch_optional(self.pool)
            .await?;
        Ok(key)
    }

    /// Records one request: increments the counter and stamps `last_used_at`.
    /// Callers may batch these updates since the field is advisory.
    ///
    /// # Errors
    /// Returns `DbError` if the update fails
    pub async fn record_usage(&self, id: Uuid) -> Result<(), DbError> {
        sqlx::query("UPDATE api_keys SET request_count = request_count + 1, last_used_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the update fails
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE api_keys SET is_active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("api key {id}")));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get(&self, id: Uuid) -> Result<Option<ApiKey>, DbError> {
        let key = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys WHERE id = $1").bind(id).fetch_optional(self.pool).await?;
        Ok(key)
    }

    /// Lists every key, most recently created first. Admin-scoped, so no
    /// pagination contract is imposed - the full set is always small.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list(&self) -> Result<Vec<ApiKey>, DbError> {
        let keys = sqlx::query_as::<_, ApiKey>("SELECT * FROM api_keys ORDER BY created_at DESC")
            .fetch_all(self.pool)
            .await?;
        Ok(keys)
    }

    /// # Errors
    /// Returns `DbError` if the update fails, or `NotFound` if the id is unknown.
    pub async fn update_limit(&self, id: Uuid, requests_per_hour: i32) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE api_keys SET requests_per_hour = $1 WHERE id = $2")
            .bind(requests_per_hour)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("api key {id}")));
        }
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the delete fails, or `NotFound` if the id is unknown.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1").bind(id).execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(format!("api key {id}")));
        }
        Ok(())
    }
}
