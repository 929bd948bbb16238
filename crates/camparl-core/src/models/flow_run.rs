//! Flow and task run models - durable history for the scheduler runtime

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle state of a flow or task run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Crashed,
    Cancelled,
}

impl RunStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Crashed | Self::Cancelled)
    }
}

/// One execution of a named flow, claimed by a worker from its work pool.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FlowRun {
    pub id: Uuid,
    pub flow_name: String,
    pub pool_tag: String,
    pub status: RunStatus,
    pub parameters: serde_json::Value,
    pub scheduled_for: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FlowRun {
    #[must_use]
    pub fn new(flow_name: String, pool_tag: String, parameters: serde_json::Value, scheduled_for: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            flow_name,
            pool_tag,
            status: RunStatus::Pending,
            parameters,
            scheduled_for,
            started_at: None,
            finished_at: None,
            cancelled_at: None,
            error: None,
            created_at: Utc::now(),
        }
    }
}

/// One execution of a task within a flow run.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TaskRun {
    pub id: Uuid,
    pub flow_run_id: Uuid,
    pub task_name: String,
    pub status: RunStatus,
    pub attempt: i32,
    pub retries_allowed: i32,
    pub cache_key: Option<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub log_tail: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TaskRun {
    #[must_use]
    pub fn new(flow_run_id: Uuid, task_name: String, retries_allowed: i32, cache_key: Option<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            flow_run_id,
            task_name,
            status: RunStatus::Pending,
            attempt: 1,
            retries_allowed,
            cache_key,
            result: None,
            error: None,
            log_tail: None,
            started_at: None,
            finished_at: None,
            created_at: Utc::now(),
        }
    }

    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.attempt <= self.retries_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(RunStatus::Completed.is_terminal());
        assert!(RunStatus::Cancelled.is_terminal());
        assert!(!RunStatus::Running.is_terminal());
    }

    #[test]
    fn retry_budget_respected() {
        let mut task = TaskRun::new(Uuid::now_v7(), "fetch_bills".into(), 2, None);
        assert!(task.can_retry());
        task.attempt = 3;
        assert!(!task.can_retry());
    }
}
