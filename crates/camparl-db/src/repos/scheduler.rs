//! Flow and task run repositories - durable history for the scheduler runtime

use crate::DbError;
use camparl_core::{FlowRun, RunStatus, TaskRun};
use sqlx::PgPool;
use uuid::Uuid;

pub struct FlowRunRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FlowRunRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn create(&self, run: &FlowRun) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO flow_runs (id, flow_name, pool_tag, status, parameters, scheduled_for,
                                    started_at, finished_at, cancelled_at, error, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ",
        )
        .bind(run.id)
        .bind(&run.flow_name)
        .bind(&run.pool_tag)
        .bind(run.status)
        .bind(&run.parameters)
        .bind(run.scheduled_for)
        .bind(run.started_at)
        .bind(run.finished_at)
        .bind(run.cancelled_at)
        .bind(&run.error)
        .bind(run.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Claims one pending run for the given pool tag with an optimistic
    /// `UPDATE ... RETURNING`: no separate lock table, and a losing racer
    /// simply gets back `None`.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn claim_next(&self, pool_tag: &str) -> Result<Option<FlowRun>, DbError> {
        let run = sqlx::query_as::<_, FlowRun>(
            r"
            UPDATE flow_runs SET status = 'running', started_at = NOW()
            WHERE id = (
                SELECT id FROM flow_runs
                WHERE pool_tag = $1 AND status = 'pending' AND scheduled_for <= NOW()
                ORDER BY scheduled_for ASC
                LIMIT 1
                FOR UPDATE SKIP LOCKED
            )
            RETURNING *
            ",
        )
        .bind(pool_tag)
        .fetch_optional(self.pool)
        .await?;
        Ok(run)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn get(&self, id: Uuid) -> Result<Option<FlowRun>, DbError> {
        let run = sqlx::query_as::<_, FlowRun>("SELECT * FROM flow_runs WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(run)
    }

    /// # Errors
    /// Returns `DbError` if the update fails
    pub async fn finish(&self, id: Uuid, status: RunStatus, error: Option<&str>) -> Result<(), DbError> {
        sqlx::query("UPDATE flow_runs SET status = $1, finished_at = NOW(), error = $2 WHERE id = $3")
            .bind(status)
            .bind(error)
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Marks a run cancelled if it hasn't already reached a terminal state.
    /// Cooperative: in-flight tasks are expected to observe this at their
    /// next scheduling point rather than being forcibly aborted.
    ///
    /// # Errors
    /// Returns `DbError` if the update fails
    pub async fn cancel(&self, id: Uuid) -> Result<(), DbError> {
        sqlx::query(
            r"
            UPDATE flow_runs SET status = 'cancelled', cancelled_at = NOW()
            WHERE id = $1 AND status IN ('pending', 'running')
            ",
        )
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn history(&self, flow_name: &str, limit: i64) -> Result<Vec<FlowRun>, DbError> {
        let runs = sqlx::query_as::<_, FlowRun>(
            "SELECT * FROM flow_runs WHERE flow_name = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(flow_name)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;
        Ok(runs)
    }
}

pub struct TaskRunRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> TaskRunRepo<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// # Errors
    /// Returns `DbError` if the insert fails
    pub async fn create(&self, task: &TaskRun) -> Result<(), DbError> {
        sqlx::query(
            r"
            INSERT INTO task_runs (id, flow_run_id, task_name, status, attempt, retries_allowed,
                                    cache_key, result, error, log_tail, started_at, finished_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ",
        )
        .bind(task.id)
        .bind(task.flow_run_id)
        .bind(&task.task_name)
        .bind(task.status)
        .bind(task.attempt)
        .bind(task.retries_allowed)
        .bind(&task.cache_key)
        .bind(&task.result)
        .bind(&task.error)
        .bind(&task.log_tail)
        .bind(task.started_at)
        .bind(task.finished_at)
        .bind(task.created_at)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// # Errors
    /// Returns `DbError` if the update fails
    pub async fn finish(
        &self,
        id: Uuid,
        status: RunStatus,
        result: Option<&serde_json::Value>,
        error: Option<&str>,
        log_tail: Option<&str>,
    ) -> Result<(), DbError> {
        sqlx::query(
            r"
            UPDATE task_runs SET status = $1, result = $2, error = $3, log_tail = $4, finished_at = NOW()
            WHERE id = $5
            ",
        )
        .bind(status)
        .bind(result)
        .bind(error)
        .bind(log_tail)
        .bind(id)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Looks up a cached, completed result by its derived cache key, honoring
    /// the caller's expiry horizon.
    ///
    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn find_cached(&self, cache_key: &str, max_age_secs: i64) -> Result<Option<TaskRun>, DbError> {
        let task = sqlx::query_as::<_, TaskRun>(
            r"
            SELECT * FROM task_runs
            WHERE cache_key = $1 AND status = 'completed' AND finished_at > NOW() - ($2 || ' seconds')::INTERVAL
            ORDER BY finished_at DESC
            LIMIT 1
            ",
        )
        .bind(cache_key)
        .bind(max_age_secs.to_string())
        .fetch_optional(self.pool)
        .await?;
        Ok(task)
    }

    /// # Errors
    /// Returns `DbError` if the query fails
    pub async fn list_for_run(&self, flow_run_id: Uuid) -> Result<Vec<TaskRun>, DbError> {
        let tasks = sqlx::query_as::<_, TaskRun>("SELECT * FROM task_runs WHERE flow_run_id = $1 ORDER BY created_at ASC")
            .bind(flow_run_id)
            .fetch_all(self.pool)
            .await?;
        Ok(tasks)
    }
}
