//! Vote (division) repository

use crate::DbError;
use camparl_core::{Vote, VoteResult};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct VoteRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> VoteRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, vote: &Vote) -> Result<(), DbError> {
        Self::upsert_via(self.pool, vote).await
    }

    /// Same as `upsert`, but runs against any `PgExecutor` - a pool, a plain
    /// connection, or a transaction - so callers that need this write as part
    /// of a larger transaction scope can pass one in explicitly.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert_via<'e, E>(executor: E, vote: &Vote) -> Result<(), DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r"
            INSERT INTO votes (id, jurisdiction, vote_id, parliament, session, number, vote_date,
                                chamber, description_en, description_fr, result, yea_count,
                                nay_count, abstain_count, bill_id, source_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            ON CONFLICT (jurisdiction, vote_id) DO UPDATE SET
                description_en = COALESCE(EXCLUDED.description_en, votes.description_en),
                description_fr = COALESCE(EXCLUDED.description_fr, votes.description_fr),
                result = EXCLUDED.result,
                yea_count = EXCLUDED.yea_count,
                nay_count = EXCLUDED.nay_count,
                abstain_count = EXCLUDED.abstain_count,
                bill_id = COALESCE(EXCLUDED.bill_id, votes.bill_id),
                source_url = COALESCE(EXCLUDED.source_url, votes.source_url),
                updated_at = CASE
                    WHEN votes.result IS DISTINCT FROM EXCLUDED.result
                      OR votes.yea_count IS DISTINCT FROM EXCLUDED.yea_count
                      OR votes.nay_count IS DISTINCT FROM EXCLUDED.nay_count
                      OR votes.abstain_count IS DISTINCT FROM EXCLUDED.abstain_count
                    THEN NOW()
                    ELSE votes.updated_at
                END
            ",
        )
        .bind(vote.id)
        .bind(&vote.jurisdiction)
        .bind(&vote.vote_id)
        .bind(vote.parliament)
        .bind(vote.session)
        .bind(vote.number)
        .bind(vote.vote_date)
        .bind(&vote.chamber)
        .bind(&vote.description_en)
        .bind(&vote.description_fr)
        .bind(vote.result)
        .bind(vote.yea_count)
        .bind(vote.nay_count)
        .bind(vote.abstain_count)
        .bind(vote.bill_id)
        .bind(&vote.source_url)
        .bind(vote.created_at)
        .bind(vote.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Upsert many votes in a single statement. Callers must slice batches to
    /// at most 500 records.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many(&self, votes: &[Vote]) -> Result<(i64, i64), DbError> {
        if votes.is_empty() {
            return Ok((0, 0));
        }
        if votes.len() > 500 {
            return Err(DbError::InvalidOperation("upsert_many batch exceeds 500 records".to_string()));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO votes (id, jurisdiction, vote_id, parliament, session, number, vote_date, \
             chamber, description_en, description_fr, result, yea_count, nay_count, abstain_count, \
             bill_id, source_url, created_at, updated_at) ",
        );
        builder.push_values(votes, |mut row, vote| {
            row.push_bind(vote.id)
                .push_bind(&vote.jurisdiction)
                .push_bind(&vote.vote_id)
                .push_bind(vote.parliament)
                .push_bind(vote.session)
                .push_bind(vote.number)
                .push_bind(vote.vote_date)
                .push_bind(&vote.chamber)
                .push_bind(&vote.description_en)
                .push_bind(&vote.description_fr)
                .push_bind(vote.result)
                .push_bind(vote.yea_count)
                .push_bind(vote.nay_count)
                .push_bind(vote.abstain_count)
                .push_bind(vote.bill_id)
                .push_bind(&vote.source_url)
                .push_bind(vote.created_at)
                .push_bind(vote.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (jurisdiction, vote_id) DO UPDATE SET
                description_en = COALESCE(EXCLUDED.description_en, votes.description_en),
                description_fr = COALESCE(EXCLUDED.description_fr, votes.description_fr),
                result = EXCLUDED.result,
                yea_count = EXCLUDED.yea_count,
                nay_count = EXCLUDED.nay_count,
                abstain_count = EXCLUDED.abstain_count,
                bill_id = COALESCE(EXCLUDED.bill_id, votes.bill_id),
                source_url = COALESCE(EXCLUDED.source_url, votes.source_url),
                updated_at = CASE
                    WHEN votes.result IS DISTINCT FROM EXCLUDED.result
                      OR votes.yea_count IS DISTINCT FROM EXCLUDED.yea_count
                      OR votes.nay_count IS DISTINCT FROM EXCLUDED.nay_count
                      OR votes.abstain_count IS DISTINCT FROM EXCLUDED.abstain_count
                    THEN NOW()
                    ELSE votes.updated_at
                END
            RETURNING (xmax = 0) AS inserted
            ",
        );

        let rows: Vec<(bool,)> = builder.build_query_as().fetch_all(self.pool).await?;
        let created = rows.iter().filter(|(inserted,)| *inserted).count() as i64;
        let updated = rows.len() as i64 - created;
        Ok((created, updated))
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Vote>, DbError> {
        let vote = sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(vote)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key(&self, jurisdiction: &str, vote_id: &str) -> Result<Option<Vote>, DbError> {
        Self::get_by_natural_key_via(self.pool, jurisdiction, vote_id).await
    }

    /// Same as `get_by_natural_key`, but runs against any `PgExecutor`.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key_via<'e, E>(executor: E, jurisdiction: &str, vote_id: &str) -> Result<Option<Vote>, DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let vote = sqlx::query_as::<_, Vote>("SELECT * FROM votes WHERE jurisdiction = $1 AND vote_id = $2")
            .bind(jurisdiction)
            .bind(vote_id)
            .fetch_optional(executor)
            .await?;
        Ok(vote)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    #[allow(clippy::too_many_arguments)]
    pub async fn list(
        &self,
        jurisdiction: &str,
        parliament: Option<i16>,
        session: Option<i16>,
        bill_id: Option<Uuid>,
        result: Option<VoteResult>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Vote>, i64), DbError> {
        let votes = sqlx::query_as::<_, Vote>(
            r"
            SELECT * FROM votes
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND ($4::UUID IS NULL OR bill_id = $4)
              AND ($5::VARCHAR IS NULL OR result = $5)
            ORDER BY vote_date DESC, number DESC
            LIMIT $6 OFFSET $7
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(bill_id)
        .bind(result)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM votes
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND ($4::UUID IS NULL OR bill_id = $4)
              AND ($5::VARCHAR IS NULL OR result = $5)
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(bill_id)
        .bind(result)
        .fetch_one(self.pool)
        .await?;

        Ok((votes, total))
    }
}
