//! Ad-hoc one-shot ingestion, outside the scheduler - the same integration
//! services the worker runs on a cron, invoked directly for backfills.

use std::sync::Arc;

use camparl_adapters::{AdapterConfig, HtmlEnrichmentClient, HttpCatalogueClient, SourceRateLimiter};
use camparl_pipeline::services::{BillIngestService, CommitteeIngestService, DebateIngestService, PoliticianIngestService, VoteIngestService};
use clap::ValueEnum;
use color_eyre::eyre::Result;
use colored::Colorize;

use super::get_database;

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Domain {
    Bills,
    Politicians,
    Votes,
    Committees,
    Debates,
    All,
}

pub async fn run(domain: Domain, jurisdiction: String, parliament: i16, session: i16) -> Result<()> {
    let db = get_database().await?;
    let config = AdapterConfig::from_env();
    let catalogue = HttpCatalogueClient::new(config.catalogue_base_url.clone(), SourceRateLimiter::catalogue(), config.request_timeout);
    let enrichment = Arc::new(HtmlEnrichmentClient::new(
        config.enrichment_base_url.clone(),
        SourceRateLimiter::enrichment(),
        config.request_timeout,
    ));

    if matches!(domain, Domain::Bills | Domain::All) {
        let log = BillIngestService::new(&db, &catalogue, Some(enrichment.as_ref())).run(&jurisdiction).await?;
        report("bills", log.records_attempted, log.records_succeeded, log.records_failed);
    }
    if matches!(domain, Domain::Politicians | Domain::All) {
        let log = PoliticianIngestService::new(&db, &catalogue).run(&jurisdiction).await?;
        report("politicians", log.records_attempted, log.records_succeeded, log.records_failed);
    }
    if matches!(domain, Domain::Votes | Domain::All) {
        let log = VoteIngestService::new(&db, &catalogue).run(&jurisdiction).await?;
        report("votes", log.records_attempted, log.records_succeeded, log.records_failed);
    }
    if matches!(domain, Domain::Committees | Domain::All) {
        let log = CommitteeIngestService::new(&db, &catalogue, Some(enrichment.as_ref())).run(&jurisdiction, parliament, session).await?;
        report("committees", log.records_attempted, log.records_succeeded, log.records_failed);
    }
    if matches!(domain, Domain::Debates | Domain::All) {
        let log = DebateIngestService::new(&db, &catalogue).run(&jurisdiction).await?;
        report("debates", log.records_attempted, log.records_succeeded, log.records_failed);
    }

    Ok(())
}

fn report(source: &str, attempted: i32, succeeded: i32, failed: i32) {
    let label = if failed == 0 { source.green() } else { source.yellow() };
    println!(
        "{label}: attempted {attempted}, succeeded {}, failed {}",
        succeeded.to_string().cyan(),
        if failed > 0 { failed.to_string().red() } else { failed.to_string().dimmed() }
    );
}
