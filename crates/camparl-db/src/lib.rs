//! Database layer for the parliamentary data platform

mod error;
mod repos;

pub use error::DbError;
pub use repos::*;

use futures::future::BoxFuture;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Postgres, Transaction};

/// Database connection wrapper
#[derive(Clone)]
pub struct Database(PgPool);

impl Database {
    /// Connect to the database with the given URL and run migrations to head.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the connection or migration fails
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self(pool))
    }

    /// Get the underlying connection pool
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.0
    }

    /// Runs `f` against a single transaction, committing on success and
    /// rolling back on the first error. Callers reach into repositories via
    /// their `*_via` associated functions, which accept any `PgExecutor`
    /// (pool, connection, or transaction) instead of the repo's own pool.
    ///
    /// # Errors
    /// Returns `DbError` if the transaction cannot be opened, `f` fails, or
    /// the commit fails.
    pub async fn transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: for<'t> FnOnce(&'t mut Transaction<'_, Postgres>) -> BoxFuture<'t, Result<T, DbError>>,
    {
        let mut tx = self.0.begin().await?;
        match f(&mut tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(error) => {
                tx.rollback().await?;
                Err(error)
            }
        }
    }

    #[must_use]
    pub const fn bills(&self) -> BillRepo<'_> {
        BillRepo::new(&self.0)
    }

    #[must_use]
    pub const fn politicians(&self) -> PoliticianRepo<'_> {
        PoliticianRepo::new(&self.0)
    }

    #[must_use]
    pub const fn votes(&self) -> VoteRepo<'_> {
        VoteRepo::new(&self.0)
    }

    #[must_use]
    pub const fn vote_records(&self) -> VoteRecordRepo<'_> {
        VoteRecordRepo::new(&self.0)
    }

    #[must_use]
    pub const fn committees(&self) -> CommitteeRepo<'_> {
        CommitteeRepo::new(&self.0)
    }

    #[must_use]
    pub const fn committee_meetings(&self) -> CommitteeMeetingRepo<'_> {
        CommitteeMeetingRepo::new(&self.0)
    }

    #[must_use]
    pub const fn debates(&self) -> DebateRepo<'_> {
        DebateRepo::new(&self.0)
    }

    #[must_use]
    pub const fn speeches(&self) -> SpeechRepo<'_> {
        SpeechRepo::new(&self.0)
    }

    #[must_use]
    pub const fn fetch_logs(&self) -> FetchLogRepo<'_> {
        FetchLogRepo::new(&self.0)
    }

    #[must_use]
    pub const fn api_keys(&self) -> ApiKeyRepo<'_> {
        ApiKeyRepo::new(&self.0)
    }

    #[must_use]
    pub const fn ignored_bills(&self) -> IgnoredBillRepo<'_> {
        IgnoredBillRepo::new(&self.0)
    }

    #[must_use]
    pub const fn feed_tokens(&self) -> FeedTokenRepo<'_> {
        FeedTokenRepo::new(&self.0)
    }

    #[must_use]
    pub const fn flow_runs(&self) -> FlowRunRepo<'_> {
        FlowRunRepo::new(&self.0)
    }

    #[must_use]
    pub const fn task_runs(&self) -> TaskRunRepo<'_> {
        TaskRunRepo::new(&self.0)
    }
}
