//! Debate and speech repositories

use crate::DbError;
use camparl_core::{Debate, Speech};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct DebateSearchRow {
    #[sqlx(flatten)]
    debate: Debate,
    rank: f32,
    snippet: String,
}

pub struct DebateRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DebateRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert a debate and populate its search vector from the bilingual topic.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, debate: &Debate) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO debates (id, jurisdiction, hansard_id, parliament, session, number,
                                  debate_date, chamber, debate_type, topic_en, topic_fr,
                                  search_vector, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                    to_tsvector('english', COALESCE($10, '') || ' ' || COALESCE($11, '')), $12, $13)
            ON CONFLICT (jurisdiction, hansard_id) DO UPDATE SET
                debate_type = COALESCE(EXCLUDED.debate_type, debates.debate_type),
                topic_en = COALESCE(EXCLUDED.topic_en, debates.topic_en),
                topic_fr = COALESCE(EXCLUDED.topic_fr, debates.topic_fr),
                search_vector = to_tsvector('english', COALESCE(EXCLUDED.topic_en, debates.topic_en, '') || ' ' || COALESCE(EXCLUDED.topic_fr, debates.topic_fr, '')),
                updated_at = CASE
                    WHEN debates.topic_en IS DISTINCT FROM COALESCE(EXCLUDED.topic_en, debates.topic_en)
                      OR debates.topic_fr IS DISTINCT FROM COALESCE(EXCLUDED.topic_fr, debates.topic_fr)
                      OR debates.debate_type IS DISTINCT FROM COALESCE(EXCLUDED.debate_type, debates.debate_type)
                    THEN NOW()
                    ELSE debates.updated_at
                END
            ",
        )
        .bind(debate.id)
        .bind(&debate.jurisdiction)
        .bind(&debate.hansard_id)
        .bind(debate.parliament)
        .bind(debate.session)
        .bind(debate.number)
        .bind(debate.debate_date)
        .bind(&debate.chamber)
        .bind(&debate.debate_type)
        .bind(&debate.topic_en)
        .bind(&debate.topic_fr)
        .bind(debate.created_at)
        .bind(debate.updated_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Upsert many debates in a single statement. Callers must slice batches
    /// to at most 500 records.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many(&self, debates: &[Debate]) -> Result<(i64, i64), DbError> {
        if debates.is_empty() {
            return Ok((0, 0));
        }
        if debates.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO debates (id, jurisdiction, hansard_id, parliament, session, number, debate_date, \
             chamber, debate_type, topic_en, topic_fr, search_vector, created_at, updated_at) ",
        );
        builder.push_values(debates, |mut row, debate| {
            row.push_bind(debate.id)
                .push_bind(&debate.jurisdiction)
                .push_bind(&debate.hansard_id)
                .push_bind(debate.parliament)
                .push_bind(debate.session)
                .push_bind(debate.number)
                .push_bind(debate.debate_date)
                .push_bind(&debate.chamber)
                .push_bind(&debate.debate_type)
                .push_bind(&debate.topic_en)
                .push_bind(&debate.topic_fr)
                .push("to_tsvector('english', ")
                .push_bind_unseparated(debate.topic_en.clone().unwrap_or_default())
                .push_unseparated(" || ' ' || ")
                .push_bind_unseparated(debate.topic_fr.clone().unwrap_or_default())
                .push_unseparated(")")
                .push_bind(debate.created_at)
                .push_bind(debate.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (jurisdiction, hansard_id) DO UPDATE SET
                debate_type = COALESCE(EXCLUDED.debate_type, debates.debate_type),
                topic_en = COALESCE(EXCLUDED.topic_en, debates.topic_en),
                topic_fr = COALESCE(EXCLUDED.topic_fr, debates.topic_fr),
                search_vector = EXCLUDED.search_vector,
                updated_at = CASE
                    WHEN debates.topic_en IS DISTINCT FROM COALESCE(EXCLUDED.topic_en, debates.topic_en)
                      OR debates.topic_fr IS DISTINCT FROM COALESCE(EXCLUDED.topic_fr, debates.topic_fr)
                      OR debates.debate_type IS DISTINCT FROM COALESCE(EXCLUDED.debate_type, debates.debate_type)
                    THEN NOW()
                    ELSE debates.updated_at
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
    pub async fn get_by_natural_key(&self, jurisdiction: &str, hansard_id: &str) -> Result<Option<Debate>, DbError> {
        let debate =
            sqlx::query_as::<_, Debate>("SELECT * FROM debates WHERE jurisdiction = $1 AND hansard_id = $2")
                .bind(jurisdiction)
                .bind(hansard_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(debate)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list(
        &self,
        jurisdiction: &str,
        parliament: Option<i16>,
        session: Option<i16>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Debate>, i64), DbError> {
        let debates = sqlx::query_as::<_, Debate>(
            r"
            SELECT * FROM debates
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
            ORDER BY debate_date DESC, number DESC
            LIMIT $4 OFFSET $5
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM debates
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .fetch_one(self.pool)
        .await?;

        Ok((debates, total))
    }

    /// Full-text search over debate topics, ranked by `ts_rank_cd`.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn search_by_content(
        &self,
        jurisdiction: &str,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<(Debate, f32, String)>, DbError> {
        let rows: Vec<DebateSearchRow> = sqlx::query_as(
            r"
            SELECT
                debates.*,
                ts_rank_cd(search_vector, websearch_to_tsquery('english', $2), 32) AS rank,
                ts_headline('english', COALESCE(topic_en, ''), websearch_to_tsquery('english', $2)) AS snippet
            FROM debates
            WHERE jurisdiction = $1 AND search_vector @@ websearch_to_tsquery('english', $2)
            ORDER BY rank DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(jurisdiction)
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| (r.debate, r.rank, r.snippet)).collect())
    }
}

#[derive(sqlx::FromRow)]
struct SpeechSearchRow {
    #[sqlx(flatten)]
    speech: Speech,
    rank: f32,
    snippet: String,
}

pub struct SpeechRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> SpeechRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Upsert many speeches for a debate in one statement. Bounded to 500 per call.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is oversized or the insert fails
    pub async fn upsert_many(&self, speeches: &[Speech]) -> Result<(i64, i64), DbError> {
        if speeches.is_empty() {
            return Ok((0, 0));
        }
        if speeches.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO speeches (id, debate_id, sequence, politician_id, speaker_name, role, \
             language, text_en, text_fr, spoken_at, created_at, updated_at) ",
        );
        builder.push_values(speeches, |mut row, speech| {
            row.push_bind(speech.id)
                .push_bind(speech.debate_id)
                .push_bind(speech.sequence)
                .push_bind(speech.politician_id)
                .push_bind(&speech.speaker_name)
                .push_bind(&speech.role)
                .push_bind(&speech.language)
                .push_bind(&speech.text_en)
                .push_bind(&speech.text_fr)
                .push_bind(speech.spoken_at)
                .push_bind(speech.created_at)
                .push_bind(speech.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (debate_id, sequence) DO UPDATE SET
                politician_id = COALESCE(EXCLUDED.politician_id, speeches.politician_id),
                speaker_name = EXCLUDED.speaker_name,
                text_en = COALESCE(EXCLUDED.text_en, speeches.text_en),
                text_fr = COALESCE(EXCLUDED.text_fr, speeches.text_fr),
                updated_at = CASE
                    WHEN speeches.text_en IS DISTINCT FROM COALESCE(EXCLUDED.text_en, speeches.text_en)
                      OR speeches.text_fr IS DISTINCT FROM COALESCE(EXCLUDED.text_fr, speeches.text_fr)
                      OR speeches.politician_id IS DISTINCT FROM COALESCE(EXCLUDED.politician_id, speeches.politician_id)
                    THEN NOW()
                    ELSE speeches.updated_at
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
    pub async fn list_for_debate(
        &self,
        debate_id: Uuid,
        politician_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Speech>, i64), DbError> {
        let speeches = sqlx::query_as::<_, Speech>(
            r"
            SELECT * FROM speeches
            WHERE debate_id = $1 AND ($2::UUID IS NULL OR politician_id = $2)
            ORDER BY sequence ASC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(debate_id)
        .bind(politician_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM speeches WHERE debate_id = $1 AND ($2::UUID IS NULL OR politician_id = $2)",
        )
        .bind(debate_id)
        .bind(politician_id)
        .fetch_one(self.pool)
        .await?;

        Ok((speeches, total))
    }

    /// Full-text search over English speech text. Unlike bills/debates, the
    /// index here isn't a maintained column - speeches are append-only and
    /// too numerous to justify an extra stored generated column, so the
    /// expression index declared in the migration backs this query directly.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn search_by_content(&self, query: &str, limit: i64, offset: i64) -> Result<Vec<(Speech, f32, String)>, DbError> {
        let rows: Vec<SpeechSearchRow> = sqlx::query_as(
            r"
            SELECT
                speeches.*,
                ts_rank_cd(to_tsvector('english', COALESCE(text_en, '')), websearch_to_tsquery('english', $1), 32) AS rank,
                ts_headline('english', COALESCE(text_en, ''), websearch_to_tsquery('english', $1)) AS snippet
            FROM speeches
            WHERE to_tsvector('english', COALESCE(text_en, '')) @@ websearch_to_tsquery('english', $1)
            ORDER BY rank DESC
            LIMIT $2 OFFSET $3
            ",
        )
        .bind(query)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| (r.speech, r.rank, r.snippet)).collect())
    }
}
