//! Committee and committee meeting repositories

use crate::DbError;
use camparl_core::{Committee, CommitteeMeeting};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

pub struct CommitteeRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommitteeRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, committee: &Committee) -> Result<(), DbError> {
        Self::upsert_via(self.pool, committee).await
    }

    /// Same as `upsert`, but runs against any `PgExecutor`, so callers that
    /// need this write as part of a larger transaction scope can pass one in
    /// explicitly.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert_via<'e, E>(executor: E, committee: &Committee) -> Result<(), DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r"
            INSERT INTO committees (id, jurisdiction, parliament, session, slug, name_en, name_fr,
                                     acronym, chamber, parent_committee_id, source_url, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (jurisdiction, parliament, session, slug) DO UPDATE SET
                name_en = EXCLUDED.name_en,
                name_fr = COALESCE(EXCLUDED.name_fr, committees.name_fr),
                acronym = COALESCE(EXCLUDED.acronym, committees.acronym),
                chamber = EXCLUDED.chamber,
                parent_committee_id = COALESCE(EXCLUDED.parent_committee_id, committees.parent_committee_id),
                source_url = COALESCE(EXCLUDED.source_url, committees.source_url),
                updated_at = CASE
                    WHEN committees.name_en IS DISTINCT FROM EXCLUDED.name_en
                      OR committees.chamber IS DISTINCT FROM EXCLUDED.chamber
                      OR committees.name_fr IS DISTINCT FROM COALESCE(EXCLUDED.name_fr, committees.name_fr)
                      OR committees.acronym IS DISTINCT FROM COALESCE(EXCLUDED.acronym, committees.acronym)
                    THEN NOW()
                    ELSE committees.updated_at
                END
            ",
        )
        .bind(committee.id)
        .bind(&committee.jurisdiction)
        .bind(committee.parliament)
        .bind(committee.session)
        .bind(&committee.slug)
        .bind(&committee.name_en)
        .bind(&committee.name_fr)
        .bind(&committee.acronym)
        .bind(&committee.chamber)
        .bind(committee.parent_committee_id)
        .bind(&committee.source_url)
        .bind(committee.created_at)
        .bind(committee.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Upsert many committees in a single statement. Callers must slice
    /// batches to at most 500 records.
    ///
    /// # Errors
    /// Returns `DbError` if the batch is empty, oversized, or the insert fails
    pub async fn upsert_many(&self, committees: &[Committee]) -> Result<(i64, i64), DbError> {
        if committees.is_empty() {
            return Ok((0, 0));
        }
        if committees.len() > 500 {
            return Err(DbError::InvalidOperation(
                "upsert_many batch exceeds 500 records".to_string(),
            ));
        }

        let mut builder = QueryBuilder::new(
            "INSERT INTO committees (id, jurisdiction, parliament, session, slug, name_en, name_fr, \
             acronym, chamber, parent_committee_id, source_url, created_at, updated_at) ",
        );
        builder.push_values(committees, |mut row, committee| {
            row.push_bind(committee.id)
                .push_bind(&committee.jurisdiction)
                .push_bind(committee.parliament)
                .push_bind(committee.session)
                .push_bind(&committee.slug)
                .push_bind(&committee.name_en)
                .push_bind(&committee.name_fr)
                .push_bind(&committee.acronym)
                .push_bind(&committee.chamber)
                .push_bind(committee.parent_committee_id)
                .push_bind(&committee.source_url)
                .push_bind(committee.created_at)
                .push_bind(committee.updated_at);
        });
        builder.push(
            r"
            ON CONFLICT (jurisdiction, parliament, session, slug) DO UPDATE SET
                name_en = EXCLUDED.name_en,
                name_fr = COALESCE(EXCLUDED.name_fr, committees.name_fr),
                acronym = COALESCE(EXCLUDED.acronym, committees.acronym),
                chamber = EXCLUDED.chamber,
                parent_committee_id = COALESCE(EXCLUDED.parent_committee_id, committees.parent_committee_id),
                source_url = COALESCE(EXCLUDED.source_url, committees.source_url),
                updated_at = CASE
                    WHEN committees.name_en IS DISTINCT FROM EXCLUDED.name_en
                      OR committees.chamber IS DISTINCT FROM EXCLUDED.chamber
                      OR committees.name_fr IS DISTINCT FROM COALESCE(EXCLUDED.name_fr, committees.name_fr)
                      OR committees.acronym IS DISTINCT FROM COALESCE(EXCLUDED.acronym, committees.acronym)
                    THEN NOW()
                    ELSE committees.updated_at
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
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Committee>, DbError> {
        let committee = sqlx::query_as::<_, Committee>("SELECT * FROM committees WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(committee)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key(
        &self,
        jurisdiction: &str,
        parliament: i16,
        session: i16,
        slug: &str,
    ) -> Result<Option<Committee>, DbError> {
        Self::get_by_natural_key_via(self.pool, jurisdiction, parliament, session, slug).await
    }

    /// Same as `get_by_natural_key`, but runs against any `PgExecutor`.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get_by_natural_key_via<'e, E>(
        executor: E,
        jurisdiction: &str,
        parliament: i16,
        session: i16,
        slug: &str,
    ) -> Result<Option<Committee>, DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let committee = sqlx::query_as::<_, Committee>(
            "SELECT * FROM committees WHERE jurisdiction = $1 AND parliament = $2 AND session = $3 AND slug = $4",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(slug)
        .fetch_optional(executor)
        .await?;
        Ok(committee)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list(
        &self,
        jurisdiction: &str,
        parliament: Option<i16>,
        session: Option<i16>,
        chamber: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Committee>, i64), DbError> {
        let committees = sqlx::query_as::<_, Committee>(
            r"
            SELECT * FROM committees
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND ($4::TEXT IS NULL OR chamber = $4)
            ORDER BY name_en ASC, id ASC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(chamber)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*) FROM committees
            WHERE jurisdiction = $1
              AND ($2::SMALLINT IS NULL OR parliament = $2)
              AND ($3::SMALLINT IS NULL OR session = $3)
              AND ($4::TEXT IS NULL OR chamber = $4)
            ",
        )
        .bind(jurisdiction)
        .bind(parliament)
        .bind(session)
        .bind(chamber)
        .fetch_one(self.pool)
        .await?;

        Ok((committees, total))
    }
}

pub struct CommitteeMeetingRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommitteeMeetingRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert(&self, meeting: &CommitteeMeeting) -> Result<(), DbError> {
        Self::upsert_via(self.pool, meeting).await
    }

    /// Same as `upsert`, but runs against any `PgExecutor`, so callers that
    /// need this write as part of a larger transaction scope (alongside the
    /// owning committee's own upsert) can pass one in explicitly.
    ///
    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn upsert_via<'e, E>(executor: E, meeting: &CommitteeMeeting) -> Result<(), DbError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r"
            INSERT INTO committee_meetings (id, committee_id, meeting_number, parliament, session,
                                             meeting_date, meeting_time, title_en, title_fr,
                                             meeting_type, room, witnesses, documents, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (committee_id, meeting_number, parliament, session) DO UPDATE SET
                meeting_date = EXCLUDED.meeting_date,
                meeting_time = COALESCE(EXCLUDED.meeting_time, committee_meetings.meeting_time),
                title_en = COALESCE(EXCLUDED.title_en, committee_meetings.title_en),
                title_fr = COALESCE(EXCLUDED.title_fr, committee_meetings.title_fr),
                meeting_type = COALESCE(EXCLUDED.meeting_type, committee_meetings.meeting_type),
                room = COALESCE(EXCLUDED.room, committee_meetings.room),
                witnesses = EXCLUDED.witnesses,
                documents = EXCLUDED.documents,
                updated_at = CASE
                    WHEN committee_meetings.meeting_date IS DISTINCT FROM EXCLUDED.meeting_date
                      OR committee_meetings.witnesses IS DISTINCT FROM EXCLUDED.witnesses
                      OR committee_meetings.documents IS DISTINCT FROM EXCLUDED.documents
                    THEN NOW()
                    ELSE committee_meetings.updated_at
                END
            ",
        )
        .bind(meeting.id)
        .bind(meeting.committee_id)
        .bind(meeting.meeting_number)
        .bind(meeting.parliament)
        .bind(meeting.session)
        .bind(meeting.meeting_date)
        .bind(meeting.meeting_time)
        .bind(&meeting.title_en)
        .bind(&meeting.title_fr)
        .bind(&meeting.meeting_type)
        .bind(&meeting.room)
        .bind(&meeting.witnesses)
        .bind(&meeting.documents)
        .bind(meeting.created_at)
        .bind(meeting.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list_for_committee(
        &self,
        committee_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<CommitteeMeeting>, i64), DbError> {
        let meetings = sqlx::query_as::<_, CommitteeMeeting>(
            "SELECT * FROM committee_meetings WHERE committee_id = $1 ORDER BY meeting_date DESC, meeting_number DESC LIMIT $2 OFFSET $3",
        )
        .bind(committee_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM committee_meetings WHERE committee_id = $1")
                .bind(committee_id)
                .fetch_one(self.pool)
                .await?;

        Ok((meetings, total))
    }
}
