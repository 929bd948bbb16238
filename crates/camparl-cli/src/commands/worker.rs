//! Starts the scheduler: a cron layer that creates flow runs on their
//! deployment schedules, and a worker that polls for and executes them.
//! Runs until killed - this is the long-lived ingestion process, separate
//! from the API (see §4.5: "durable, separate from the API process").

use std::sync::Arc;
use std::time::Duration;

use camparl_adapters::{AdapterConfig, HtmlEnrichmentClient, HttpCatalogueClient, SourceRateLimiter};
use camparl_scheduler::{Worker, default_deployments, start_scheduling};
use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use super::get_database;

pub async fn run(pool_tag: String, task_concurrency: usize, jurisdiction: String) -> Result<()> {
    let db = get_database().await?;
    let config = AdapterConfig::from_env();

    let catalogue = Arc::new(HttpCatalogueClient::new(
        config.catalogue_base_url.clone(),
        SourceRateLimiter::catalogue(),
        config.request_timeout,
    ));
    let enrichment = Arc::new(HtmlEnrichmentClient::new(
        config.enrichment_base_url.clone(),
        SourceRateLimiter::enrichment(),
        config.request_timeout,
    ));

    let deployments = default_deployments(db.clone(), catalogue, enrichment, jurisdiction);

    // Keeps firing scheduled runs into flow_runs; the handle must stay alive
    // for the duration of the process.
    let _scheduler = start_scheduling(db.clone(), &deployments).await.wrap_err("failed to start cron scheduling")?;

    let worker = Worker::new(db, pool_tag.clone(), deployments)
        .with_task_concurrency(task_concurrency)
        .with_poll_interval(Duration::from_secs(5));

    worker.check_startup().await.wrap_err("worker startup check failed")?;
    info!(pool_tag, task_concurrency, "worker polling for runs");
    worker.run_forever().await.wrap_err("worker loop exited")?;
    Ok(())
}
