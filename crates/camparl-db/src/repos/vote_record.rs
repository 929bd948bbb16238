//! Vote record repository - per-politician ballots on a vote

use crate::DbError;
use camparl_core::VoteRecord;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct VoteRecordRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRecordRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert many ballots for a vote in one statement. Bounded to 500 per call.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is oversized or the insert fails
    pub async fn upsert_many(&self, records: &[VoteRecord]) -> Result<(i64, i64), DbError> {
        Self::upsert_many_via(self.pool, records).await
    }

    /// Same as `upsert_many`, but runs against any `PgExecutor`, so callers
    /// that need this write as part of a larger transaction scope can pass
    /// one in explicitly.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many_via<'e, E>(executor: E, records: &[VoteRecord]) -> Result<(i64, i64), DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        if records.is_empty() {
            return Ok((0, 0));
        }
        if records.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO vote_records (id, vote_id, politician_id, position, raw_position, party_at_vote, created_at, updated_at) ",
        );
        builder.push_values(records, |mut row, record| {
            row.push_bind(record.id)
                .push_bind(record.vote_id)
                .push_bind(record.politician_id)
                .push_bind(record.position)
                .push_bind(&record.raw_position)
                .push_bind(&record.party_at_vote)
                .push_bind(record.created_at)
                .push_bind(record.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (vote_id, politician_id) DO UPDATE SET
                position = EXCLUDED.position,
                raw_position = EXCLUDED.raw_position,
                party_at_vote = COALESCE(EXCLUDED.party_at_vote, vote_records.party_at_vote),
                updated_at = CASE
                    WHEN vote_records.position IS DISTINCT FROM EXCLUDED.position
                      OR vote_records.raw_position IS DISTINCT FROM EXCLUDED.raw_position
                    THEN NOW()
                    ELSE vote_records.updated_at
                END
            RETURNING (xmax = 0) AS inserted
            ",
        );

        let rows: Vec<(bool,)> = builder.build_query_as().fetch_all(executor).await?;
        let created = rows.iter().filter(|(inserted,)| *inserted).count() as i64;
        let updated = rows.len() as i64 - created;
        Ok((created, updated))
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list_for_vote(
        &self,
        vote_id: Uuid,
        position: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<VoteRecord>, i64), DbError> {
        let records = sqlx::query_as::<_, VoteRecord>(
            r"
            SELECT * FROM vote_records
            WHERE vote_id = $1 AND ($2::TEXT IS NULL OR position = $2::VARCHAR)
            ORDER BY politician_id
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(vote_id)
        .bind(position)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM vote_records WHERE vote_id = $1 AND ($2::TEXT IS NULL OR position = $2::VARCHAR)",
        )
        .bind(vote_id)
        .bind(position)
        .fetch_one(self.pool)
        .await?;

        Ok((records, total))
    }

    /// A politician's most recent ballots, newest vote first. Backs the
    /// per-MP feed.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list_for_politician(&self, politician_id: Uuid, limit: i64) -> Result<Vec<VoteRecord>, DbError> {
        let records = sqlx::query_as::<_, VoteRecord>(
            r"
            SELECT vote_records.* FROM vote_records
            JOIN votes ON votes.id = vote_records.vote_id
            WHERE vote_records.politician_id = $1
            ORDER BY votes.vote_date DESC, vote_records.id ASC
            LIMIT $2
            ",
        )
        .bind(politician_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(records)
    }

    /// Sum of recorded positions for a vote, used to reconcile against the
    /// vote's own denormalized tallies.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn total_for_vote(&self, vote_id: Uuid) -> Result<i64, DbError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vote_records WHERE vote_id = $1")
            .bind(vote_id)
            .fetch_one(self.pool)
            .await?;
        Ok(total)
    }
}
