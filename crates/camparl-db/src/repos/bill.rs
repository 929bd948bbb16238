//! Bill repository

use crate::DbError;
use camparl_core::Bill;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct BillSearchRow {
    #[sqlx(flatten)]
    bill: Bill,
    rank: f32,
    snippet: String,
}

#[derive(sqlx::FromRow)]
struct BillSimilarityRow {
    #[sqlx(flatten)]
    bill: Bill,
    distance: f32,
}

pub struct BillRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BillRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a single bill under its natural key.
    ///
    /// Unmodified columns on an existing row are only rewritten when the
    /// incoming value is non-null, matching the enrichment merger's own
    /// fill-the-gap precedence.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, bill: &Bill) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO bills (
                id, jurisdiction, parliament, session, number,
                title_en, title_fr, sponsor_politician_id, introduced_date, status,
                royal_assent_date, royal_assent_chapter, summary_en, summary_fr, subject_tags,
                source_primary, source_enrichment,
                last_fetched_at, last_enriched_at, embedding, search_vector, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19,
                to_tsvector('english', COALESCE($6, '') || ' ' || COALESCE($7, '') || ' ' || COALESCE($13, '')),
                $20, $21
            )
            ON CONFLICT (jurisdiction, parliament, session, number) DO UPDATE SET
                title_en = COALESCE(EXCLUDED.title_en, bills.title_en),
                title_fr = COALESCE(EXCLUDED.title_fr, bills.title_fr),
                sponsor_politician_id = COALESCE(EXCLUDED.sponsor_politician_id, bills.sponsor_politician_id),
                introduced_date = COALESCE(EXCLUDED.introduced_date, bills.introduced_date),
                status = EXCLUDED.status,
                royal_assent_date = COALESCE(EXCLUDED.royal_assent_date, bills.royal_assent_date),
                royal_assent_chapter = COALESCE(EXCLUDED.royal_assent_chapter, bills.royal_assent_chapter),
                summary_en = COALESCE(EXCLUDED.summary_en, bills.summary_en),
                summary_fr = COALESCE(EXCLUDED.summary_fr, bills.summary_fr),
                subject_tags = CASE WHEN array_length(EXCLUDED.subject_tags, 1) IS NULL THEN bills.subject_tags ELSE EXCLUDED.subject_tags END,
                source_primary = bills.source_primary OR EXCLUDED.source_primary,
                source_enrichment = bills.source_enrichment OR EXCLUDED.source_enrichment,
                last_fetched_at = COALESCE(EXCLUDED.last_fetched_at, bills.last_fetched_at),
                last_enriched_at = COALESCE(EXCLUDED.last_enriched_at, bills.last_enriched_at),
                embedding = COALESCE(EXCLUDED.embedding, bills.embedding),
                search_vector = to_tsvector(
                    'english',
                    COALESCE(EXCLUDED.title_en, bills.title_en, '') || ' ' ||
                    COALESCE(EXCLUDED.title_fr, bills.title_fr, '') || ' ' ||
                    COALESCE(EXCLUDED.summary_en, bills.summary_en, '')
                ),
                updated_at = CASE
                    WHEN bills.title_en IS DISTINCT FROM EXCLUDED.title_en
                      OR bills.status IS DISTINCT FROM EXCLUDED.status
                      OR bills.summary_en IS DISTINCT FROM EXCLUDED.summary_en
                      OR bills.source_primary IS DISTINCT FROM (bills.source_primary OR EXCLUDED.source_primary)
                      OR bills.source_enrichment IS DISTINCT FROM (bills.source_enrichment OR EXCLUDED.source_enrichment)
                    THEN NOW()
                    ELSE bills.updated_at
                END
            ",
        )
        .bind(bill.id)
        .bind(&bill.jurisdiction)
        .bind(bill.parliament)
        .bind(bill.session)
        .bind(&bill.number)
        .bind(&bill.title_en)
        .bind(&bill.title_fr)
        .bind(bill.sponsor_politician_id)
        .bind(bill.introduced_date)
        .bind(&bill.status)
        .bind(bill.royal_assent_date)
        .bind(&bill.royal_assent_chapter)
        .bind(&bill.summary_en)
        .bind(&bill.summary_fr)
        .bind(&bill.subject_tags)
        .bind(bill.source_primary)
        .bind(bill.source_enrichment)
        .bind(bill.last_fetched_at)
        .bind(bill.last_enriched_at)
        .bind(bill.embedding.clone())
        .bind(bill.created_at)
        .bind(bill.updated_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Upsert many bills in a single statement. Callers must slice batches to
    /// at most 500 records.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many(&self, bills: &[Bill]) -> Result<(i64, i64), DbError> {
        if bills.is_empty() {
            return Ok((0, 0));
        }
        if bills.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO bills (id, jurisdiction, parliament, session, number, title_en, title_fr, \
             sponsor_politician_id, introduced_date, status, royal_assent_date, royal_assent_chapter, \
             summary_en, summary_fr, subject_tags, source_primary, source_enrichment, last_fetched_at, \
             last_enriched_at, embedding, search_vector, created_at, updated_at) ",
        );
        builder.push_values(bills, |mut row, bill| {
            row.push_bind(bill.id)
                .push_bind(&bill.jurisdiction)
                .push_bind(bill.parliament)
                .push_bind(bill.session)
                .push_bind(&bill.number)
                .push_bind(&bill.title_en)
                .push_bind(&bill.title_fr)
                .push_bind(bill.sponsor_politician_id)
                .push_bind(bill.introduced_date)
                .push_bind(&bill.status)
                .push_bind(bill.royal_assent_date)
                .push_bind(&bill.royal_assent_chapter)
                .push_bind(&bill.summary_en)
                .push_bind(&bill.summary_fr)
                .push_bind(&bill.subject_tags)
                .push_bind(bill.source_primary)
                .push_bind(bill.source_enrichment)
                .push_bind(bill.last_fetched_at)
                .push_bind(bill.last_enriched_at)
                .push_bind(bill.embedding.clone())
                .push("to_tsvector('english', ")
                .push_bind_unseparated(bill.title_en.clone().unwrap_or_default())
                .push_unseparated(" || ' ' || ")
                .push_bind_unseparated(bill.title_fr.clone().unwrap_or_default())
                .push_unseparated(" || ' ' || ")
                .push_bind_unseparated(bill.summary_en.clone().unwrap_or_default())
                .push_unseparated(")")
                .push_bind(bill.created_at)
                .push_bind(bill.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (jurisdiction, parliament, session, number) DO UPDATE SET
                title_en = COALESCE(EXCLUDED.title_en, bills.title_en),
                title_fr = COALESCE(EXCLUDED.title_fr, bills.title_fr),
                status = EXCLUDED.status,
                summary_en = COALESCE(EXCLUDED.summary_en, bills.summary_en),
                summary_fr = COALESCE(EXCLUDED.summary_fr, bills.summary_fr),
                source_primary = bills.source_primary OR EXCLUDED.source_primary,
                source_enrichment = bills.source_enrichment OR EXCLUDED.source_enrichment,
                last_fetched_at = COALESCE(EXCLUDED.last_fetched_at, bills.last_fetched_at),
                last_enriched_at = COALESCE(EXCLUDED.last_enriched_at, bills.last_enriched_at),
                embedding = COALESCE(EXCLUDED.embedding, bills.embedding),
                search_vector = EXCLUDED.search_vector,
                updated_at = CASE
                    WHEN bills.title_en IS DISTINCT FROM EXCLUDED.title_en
                      OR bills.status IS DISTINCT FROM EXCLUDED.status
                      OR bills.summary_en IS DISTINCT FROM EXCLUDED.summary_en
                      OR bills.source_primary IS DISTINCT FROM (bills.source_primary OR EXCLUDED.source_primary)
                      OR bills.source_enrichment IS DISTINCT FROM (bills.source_enrichment OR EXCLUDED.source_enrichment)
                    THEN NOW()
                    ELSE bills.updated_at
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
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Bill>, DbError> {
        let bill = sqlx::query_as::<_, Bill>("SELECT * FROM bills WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(bill)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key(
        &self,
        jurisdiction: &str,
        parliament: i16,
        session: i16,
        number: &str,
    ) -> Result<Option<Bill>, DbError> {
        let bill = sqlx::query_as::<_, Bill>(
            "SELECT * FROM bills WHERE jurisdiction = $1 AND parliament = $2 AND session = $3 AND number = $4",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(number)
        .fetch_optional(self.pool)
        .await?;
        Ok(bill)
    }

    /// Lists bills, most recently introduced first, with a stable tiebreak on id.
    ///
    /// `exclude_ids` drops bills a device has ignored; the returned total
    /// reflects the filtered count, not the unfiltered one, so pagination
    /// stays consistent with what the caller can actually page through.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list(
        &self,
        jurisdiction: &str,
        parliament: Option<i16>,
        session: Option<i16>,
        exclude_ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Bill>, i64), DbError> {
        let bills = sqlx::query_as::<_, Bill>(
            r"
            SELECT * FROM bills
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND NOT (id = ANY($4))
            ORDER BY introduced_date DESC NULLS LAST, id ASC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(exclude_ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM bills
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND NOT (id = ANY($4))
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(exclude_ids)
        .fetch_one(self.pool)
        .await?;

        Ok((bills, total))
    }

    /// Full-text search over bill titles and summaries, ranked by
    /// `ts_rank_cd` and with `ts_headline` snippets for the matched terms.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn search_by_content(
        &self,
        jurisdiction: &str,
        query: &str,
        exclude_ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<(Bill, f32, String)>, DbError> {
        let rows: Vec<BillSearchRow> = sqlx::query_as(
            r"
            SELECT
                bills.*,
                ts_rank_cd(search_vector, websearch_to_tsquery('english', $2), 32) AS rank,
                ts_headline('english', COALESCE(summary_en, title_en, ''), websearch_to_tsquery('english', $2)) AS snippet
            FROM bills
            WHERE jurisdiction = $1
              AND search_vector @@ websearch_to_tsquery('english', $2)
              AND NOT (id = ANY($3))
            ORDER BY rank DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(jurisdiction)
        .bind(query)
        .bind(exclude_ids)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| (r.bill, r.rank, r.snippet)).collect())
    }

    /// Nearest bills to a query embedding by cosine distance. Bills without
    /// an embedding never match, since the `<=>` operator against a null
    /// vector is itself null and fails the index condition.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn similar_by_embedding(
        &self,
        jurisdiction: &str,
        embedding: &pgvector::Vector,
        exclude_ids: &[Uuid],
        limit: i64,
    ) -> Result<Vec<(Bill, f32)>, DbError> {
        let rows: Vec<(Bill, f32)> = {
            let raw: Vec<BillSimilarityRow> = sqlx::query_as(
                r"
                SELECT bills.*, (embedding <=> $2) AS distance
                FROM bills
                WHERE jurisdiction = $1 AND embedding IS NOT NULL AND NOT (id = ANY($3))
                ORDER BY embedding <=> $2
                LIMIT $4
                ",
            )
            .bind(jurisdiction)
            .bind(embedding)
            .bind(exclude_ids)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
            raw.into_iter().map(|r| (r.bill, 1.0 - r.distance)).collect()
        };
        Ok(rows)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn count(&self) -> Result<i64, DbError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bills")
            .fetch_one(self.pool)
            .await?;
        Ok(count.0)
    }

    /// Bills carrying a given subject tag, most recently introduced first.
    /// Backs the per-tag feed, which has no other natural ordering key.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list_by_tag(&self, jurisdiction: &str, tag: &str, limit: i64) -> Result<Vec<Bill>, DbError> {
        let bills = sqlx::query_as::<_, Bill>(
            r"
            SELECT * FROM bills
            WHERE jurisdiction = $1 AND $2 = ANY(subject_tags)
            ORDER BY introduced_date DESC NULLS LAST, id ASC
            LIMIT $3
            ",
        )
        .bind(jurisdiction)
        .bind(tag)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(bills)
    }
}
