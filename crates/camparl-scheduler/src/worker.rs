//! Work-pool poll loop: claims pending runs tagged for this worker, dispatches
//! their tasks with bounded concurrency, and persists run/task history.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use camparl_core::{FlowRun, RunStatus, TaskRun};
use camparl_db::Database;
use tokio::sync::Semaphore;
use tokio::time::interval;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::cache::{TaskResultCache, cache_key};
use crate::deployment::{Deployment, TaskConfig};
use crate::error::SchedulerError;
use crate::task::TaskHandler;

pub struct Worker {
    db: Database,
    pool_tag: String,
    deployments: HashMap<String, Deployment>,
    cache: TaskResultCache,
    task_concurrency: usize,
    poll_interval: Duration,
}

impl Worker {
    #[must_use]
    pub fn new(db: Database, pool_tag: impl Into<String>, deployments: Vec<Deployment>) -> Self {
        let deployments = deployments.into_iter().map(|d| (d.flow_id.clone(), d)).collect();
        Self {
            db,
            pool_tag: pool_tag.into(),
            deployments,
            cache: TaskResultCache::new(1_000),
            task_concurrency: 10,
            poll_interval: Duration::from_secs(5),
        }
    }

    #[must_use]
    pub const fn with_task_concurrency(mut self, limit: usize) -> Self {
        self.task_concurrency = limit;
        self
    }

    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Verifies connectivity to the run-history store. Must be called, and
    /// must succeed, before `run_forever` starts claiming runs.
    ///
    /// # Errors
    /// Returns `SchedulerError::StartupCheck` if the store is unreachable.
    pub async fn check_startup(&self) -> Result<(), SchedulerError> {
        sqlx::query("SELECT 1")
            .execute(self.db.pool())
            .await
            .map_err(|e| SchedulerError::StartupCheck(e.to_string()))?;
        info!(pool_tag = %self.pool_tag, flows = self.deployments.len(), "scheduler startup check passed");
        Ok(())
    }

    /// Runs the poll loop until an unrecoverable store error occurs.
    ///
    /// # Errors
    /// Returns `SchedulerError` if claiming a run from the store fails.
    pub async fn run_forever(&self) -> Result<(), SchedulerError> {
        self.check_startup().await?;
        let mut ticker = interval(self.poll_interval);
        loop {
            ticker.tick().await;
            while let Some(run) = self.db.flow_runs().claim_next(&self.pool_tag).await? {
                if let Err(error) = self.execute(&run).await {
                    warn!(flow = %run.flow_name, %error, "flow run failed");
                }
            }
        }
    }

    async fn execute(&self, run: &FlowRun) -> Result<(), SchedulerError> {
        let Some(deployment) = self.deployments.get(&run.flow_name) else {
            self.db.flow_runs().finish(run.id, RunStatus::Failed, Some("unknown flow")).await?;
            return Err(SchedulerError::UnknownFlow(run.flow_name.clone()));
        };

        let semaphore = Arc::new(Semaphore::new(self.task_concurrency));
        let mut handles = Vec::with_capacity(deployment.tasks.len());

        for (task, config) in deployment.tasks.iter().zip(deployment.task_configs.iter()) {
            if self.is_cancelled(run.id).await? {
                info!(flow = %run.flow_name, run_id = %run.id, "run cancelled before dispatching remaining tasks");
                break;
            }

            let permit = Arc::clone(&semaphore).acquire_owned().await.expect("semaphore never closed");
            let task = Arc::clone(task);
            let config = config.clone();
            let params = run.parameters.clone();
            let db = self.db.clone();
            let cache = self.cache.clone();
            let run_id = run.id;

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                run_task(&db, &cache, run_id, task.as_ref(), &config, params).await
            }));
        }

        let mut any_failed = false;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(error)) => {
                    any_failed = true;
                    error!(flow = %run.flow_name, %error, "task failed");
                }
                Err(join_error) => {
                    any_failed = true;
                    error!(flow = %run.flow_name, %join_error, "task panicked");
                }
            }
        }

        let status = if any_failed { RunStatus::Failed } else { RunStatus::Completed };
        self.db.flow_runs().finish(run.id, status, None).await?;
        Ok(())
    }

    async fn is_cancelled(&self, run_id: Uuid) -> Result<bool, SchedulerError> {
        let run = self.db.flow_runs().get(run_id).await?;
        Ok(run.is_none_or(|r| matches!(r.status, RunStatus::Cancelled)))
    }
}

async fn run_task(
    db: &Database,
    cache: &TaskResultCache,
    flow_run_id: Uuid,
    task: &dyn TaskHandler,
    config: &TaskConfig,
    params: serde_json::Value,
) -> Result<(), SchedulerError> {
    let key = config.cache_ttl_secs.map(|_| cache_key(task.name(), &params));

    if let Some(key) = &key {
        if let Some(cached) = cache.get(key) {
            info!(task = task.name(), "task result served from in-process cache");
            record_cached(db, flow_run_id, task.name(), config, &cached).await?;
            return Ok(());
        }
        if let Some(ttl) = config.cache_ttl_secs {
            if let Some(prior) = db.task_runs().find_cached(key, i64::try_from(ttl).unwrap_or(i64::MAX)).await? {
                if let Some(result) = prior.result.clone() {
                    cache.insert(key.clone(), result.clone());
                    info!(task = task.name(), "task result served from durable cache");
                    record_cached(db, flow_run_id, task.name(), config, &result).await?;
                    return Ok(());
                }
            }
        }
    }

    let task_run = TaskRun::new(flow_run_id, task.name().to_string(), config.retries, key.clone());
    db.task_runs().create(&task_run).await?;

    let backoff = ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(config.retry_delay_secs))
        .with_max_times(usize::try_from(config.retries.max(0)).unwrap_or(0));

    let mut attempt = 0i32;
    let result = (|| {
        attempt += 1;
        task.call(&params)
    })
    .retry(backoff)
    .notify(|error: &SchedulerError, delay: Duration| {
        warn!(task = task.name(), %error, ?delay, "retrying failed task");
    })
    .await;

    match result {
        Ok(value) => {
            if let Some(key) = key {
                cache.insert(key, value.clone());
            }
            db.task_runs().finish(task_run.id, RunStatus::Completed, Some(&value), None, None).await?;
            Ok(())
        }
        Err(error) => {
            let message = error.to_string();
            db.task_runs().finish(task_run.id, RunStatus::Failed, None, Some(&message), None).await?;
            Err(SchedulerError::TaskExhausted {
                task: task.name().to_string(),
                attempts: attempt,
                source: message,
            })
        }
    }
}

async fn record_cached(
    db: &Database,
    flow_run_id: Uuid,
    task_name: &str,
    config: &TaskConfig,
    result: &serde_json::Value,
) -> Result<(), SchedulerError> {
    let mut task_run = TaskRun::new(flow_run_id, task_name.to_string(), config.retries, None);
    task_run.status = RunStatus::Completed;
    task_run.result = Some(result.clone());
    db.task_runs().create(&task_run).await?;
    Ok(())
}
