//! Politician repository

use crate::DbError;
use camparl_core::Politician;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

pub struct PoliticianRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PoliticianRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, politician: &Politician) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO politicians (id, jurisdiction, politician_id, first_name, last_name,
                                      current_party, current_riding, photo_url, source_url,
                                      memberships, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (jurisdiction, politician_id) DO UPDATE SET
                first_name = CASE WHEN EXCLUDED.first_name = '' THEN politicians.first_name ELSE EXCLUDED.first_name END,
                last_name = CASE WHEN EXCLUDED.last_name = '' THEN politicians.last_name ELSE EXCLUDED.last_name END,
                current_party = COALESCE(EXCLUDED.current_party, politicians.current_party),
                current_riding = COALESCE(EXCLUDED.current_riding, politicians.current_riding),
                photo_url = COALESCE(EXCLUDED.photo_url, politicians.photo_url),
                source_url = COALESCE(EXCLUDED.source_url, politicians.source_url),
                memberships = EXCLUDED.memberships,
                updated_at = CASE
                    WHEN politicians.first_name IS DISTINCT FROM (CASE WHEN EXCLUDED.first_name = '' THEN politicians.first_name ELSE EXCLUDED.first_name END)
                      OR politicians.last_name IS DISTINCT FROM (CASE WHEN EXCLUDED.last_name = '' THEN politicians.last_name ELSE EXCLUDED.last_name END)
                      OR politicians.current_party IS DISTINCT FROM COALESCE(EXCLUDED.current_party, politicians.current_party)
                      OR politicians.current_riding IS DISTINCT FROM COALESCE(EXCLUDED.current_riding, politicians.current_riding)
                      OR politicians.memberships IS DISTINCT FROM EXCLUDED.memberships
                    THEN NOW()
                    ELSE politicians.updated_at
                END
            ",
        )
        .bind(politician.id)
        .bind(&politician.jurisdiction)
        .bind(&politician.politician_id)
        .bind(&politician.first_name)
        .bind(&politician.last_name)
        .bind(&politician.current_party)
        .bind(&politician.current_riding)
        .bind(&politician.photo_url)
        .bind(&politician.source_url)
        .bind(&politician.memberships)
        .bind(politician.created_at)
        .bind(politician.updated_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Upsert many politicians in a single statement. Callers must slice
    /// batches to at most 500 records.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many(&self, politicians: &[Politician]) -> Result<(i64, i64), DbError> {
        if politicians.is_empty() {
            return Ok((0, 0));
        }
        if politicians.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO politicians (id, jurisdiction, politician_id, first_name, last_name, \
             current_party, current_riding, photo_url, source_url, memberships, created_at, updated_at) ",
        );
        builder.push_values(politicians, |mut row, politician| {
            row.push_bind(politician.id)
                .push_bind(&politician.jurisdiction)
                .push_bind(&politician.politician_id)
                .push_bind(&politician.first_name)
                .push_bind(&politician.last_name)
                .push_bind(&politician.current_party)
                .push_bind(&politician.current_riding)
                .push_bind(&politician.photo_url)
                .push_bind(&politician.source_url)
                .push_bind(&politician.memberships)
                .push_bind(politician.created_at)
                .push_bind(politician.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (jurisdiction, politician_id) DO UPDATE SET
                first_name = CASE WHEN EXCLUDED.first_name = '' THEN politicians.first_name ELSE EXCLUDED.first_name END,
                last_name = CASE WHEN EXCLUDED.last_name = '' THEN politicians.last_name ELSE EXCLUDED.last_name END,
                current_party = COALESCE(EXCLUDED.current_party, politicians.current_party),
                current_riding = COALESCE(EXCLUDED.current_riding, politicians.current_riding),
                photo_url = COALESCE(EXCLUDED.photo_url, politicians.photo_url),
                source_url = COALESCE(EXCLUDED.source_url, politicians.source_url),
                memberships = EXCLUDED.memberships,
                updated_at = CASE
                    WHEN politicians.first_name IS DISTINCT FROM (CASE WHEN EXCLUDED.first_name = '' THEN politicians.first_name ELSE EXCLUDED.first_name END)
                      OR politicians.last_name IS DISTINCT FROM (CASE WHEN EXCLUDED.last_name = '' THEN politicians.last_name ELSE EXCLUDED.last_name END)
                      OR politicians.current_party IS DISTINCT FROM COALESCE(EXCLUDED.current_party, politicians.current_party)
                      OR politicians.current_riding IS DISTINCT FROM COALESCE(EXCLUDED.current_riding, politicians.current_riding)
                      OR politicians.memberships IS DISTINCT FROM EXCLUDED.memberships
                    THEN NOW()
                    ELSE politicians.updated_at
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
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Politician>, DbError> {
        let politician = sqlx::query_as::<_, Politician>("SELECT * FROM politicians WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(politician)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key(
        &self,
        jurisdiction: &str,
        politician_id: &str,
    ) -> Result<Option<Politician>, DbError> {
        let politician = sqlx::query_as::<_, Politician>(
            "SELECT * FROM politicians WHERE jurisdiction = $1 AND politician_id = $2",
        )
        .bind(jurisdiction)
        .bind(politician_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(politician)
    }

    /// `current_only` filters to politicians with a non-null current party,
    /// the closest signal this model carries for "still sitting" absent a
    /// dedicated membership-end column.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list(
        &self,
        jurisdiction: &str,
        party: Option<&str>,
        riding: Option<&str>,
        current_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Politician>, i64), DbError> {
        let politicians = sqlx::query_as::<_, Politician>(
            r"
            SELECT * FROM politicians
            WHERE jurisdiction = $1
              AND ($2::TEXT IS NULL OR current_party = $2)
              AND ($3::TEXT IS NULL OR current_riding = $3)
              AND (NOT $4 OR current_party IS NOT NULL)
            ORDER BY last_name ASC, first_name ASC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(jurisdiction)
        .bind(party)
        .bind(riding)
        .bind(current_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM politicians
            WHERE jurisdiction = $1
              AND ($2::TEXT IS NULL OR current_party = $2)
              AND ($3::TEXT IS NULL OR current_riding = $3)
              AND (NOT $4 OR current_party IS NOT NULL)
            ",
        )
        .bind(jurisdiction)
        .bind(party)
        .bind(riding)
        .bind(current_only)
        .fetch_one(self.pool)
        .await?;

        Ok((politicians, total))
    }
}
