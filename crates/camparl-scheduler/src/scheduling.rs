//! Cron-driven run creation: one `tokio_cron_scheduler` job per deployment,
//! each inserting a `Pending` `FlowRun` row at its fire time. Claiming and
//! executing that row is the worker's job, not this one's - this keeps
//! "decide a run should exist" and "do the run" as separate concerns, same
//! split as a cron daemon handing work to a separate queue consumer.

use camparl_core::FlowRun;
use camparl_db::Database;
use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

use crate::deployment::Deployment;
use crate::error::SchedulerError;

/// Builds and starts a `JobScheduler` with one job per deployment. The
/// returned scheduler must be kept alive for the jobs to keep firing.
///
/// # Errors
/// Returns `SchedulerError::InvalidSchedule` if any deployment's cron
/// expression fails to parse, or a database error if the scheduler itself
/// cannot start.
pub async fn start(db: Database, deployments: &[Deployment]) -> Result<JobScheduler, SchedulerError> {
    let scheduler = JobScheduler::new().await.map_err(|e| SchedulerError::InvalidSchedule(e.to_string()))?;

    for deployment in deployments {
        let db = db.clone();
        let flow_id = deployment.flow_id.clone();
        let pool_tag = deployment.pool_tag.clone();
        let default_params = deployment.default_params.clone();
        let exclusive = deployment.exclusive;

        let job = Job::new_async(deployment.schedule_expr.as_str(), move |_job_id, _scheduler| {
            let db = db.clone();
            let flow_id = flow_id.clone();
            let pool_tag = pool_tag.clone();
            let default_params = default_params.clone();
            Box::pin(async move {
                if exclusive {
                    match db.flow_runs().history(&flow_id, 1).await {
                        Ok(history) if history.first().is_some_and(|r| !r.status.is_terminal()) => {
                            info!(flow = %flow_id, "skipping scheduled run: prior run still in flight (exclusive)");
                            return;
                        }
                        Err(error) => {
                            warn!(flow = %flow_id, %error, "could not check prior run before scheduling");
                            return;
                        }
                        _ => {}
                    }
                }

                let run = FlowRun::new(flow_id.clone(), pool_tag, default_params, Utc::now());
                if let Err(error) = db.flow_runs().create(&run).await {
                    warn!(flow = %flow_id, %error, "failed to create scheduled flow run");
                }
            })
        })
        .map_err(|e| SchedulerError::InvalidSchedule(format!("{}: {e}", deployment.flow_id)))?;

        scheduler.add(job).await.map_err(|e| SchedulerError::InvalidSchedule(e.to_string()))?;
    }

    scheduler.start().await.map_err(|e| SchedulerError::InvalidSchedule(e.to_string()))?;
    Ok(scheduler)
}
