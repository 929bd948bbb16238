//! Default deployments wiring each `camparl-pipeline` ingest service into a
//! scheduled flow. One task per flow; multi-task flows are for callers that
//! need finer-grained retry/cache boundaries than "the whole service call".

use std::sync::Arc;

use camparl_adapters::{HtmlEnrichmentClient, HttpCatalogueClient};
use camparl_db::Database;
use camparl_pipeline::services::{BillIngestService, CommitteeIngestService, DebateIngestService, PoliticianIngestService, VoteIngestService};

use crate::deployment::{Deployment, TaskConfig};
use crate::task::FnTask;

const POOL_TAG: &str = "default";

/// Registers one deployment per ingestible domain, each on its own cron
/// schedule, all sharing the given catalogue/enrichment clients.
#[must_use]
pub fn default_deployments(
    db: Database,
    catalogue: Arc<HttpCatalogueClient>,
    enrichment: Arc<HtmlEnrichmentClient>,
    jurisdiction: String,
) -> Vec<Deployment> {
    vec![
        bills_deployment(db.clone(), Arc::clone(&catalogue), Arc::clone(&enrichment), jurisdiction.clone()),
        politicians_deployment(db.clone(), Arc::clone(&catalogue), jurisdiction.clone()),
        votes_deployment(db.clone(), Arc::clone(&catalogue), jurisdiction.clone()),
        committees_deployment(db.clone(), Arc::clone(&catalogue), enrichment, jurisdiction.clone()),
        debates_deployment(db, catalogue, jurisdiction),
    ]
}

fn bills_deployment(
    db: Database,
    catalogue: Arc<HttpCatalogueClient>,
    enrichment: Arc<HtmlEnrichmentClient>,
    jurisdiction: String,
) -> Deployment {
    let task = FnTask::new("ingest_bills", move |params| {
        let db = db.clone();
        let catalogue = Arc::clone(&catalogue);
        let enrichment = Arc::clone(&enrichment);
        async move {
            let jurisdiction = params["jurisdiction"].as_str().unwrap_or(&jurisdiction_default()).to_string();
            let service = BillIngestService::new(&db, catalogue.as_ref(), Some(enrichment.as_ref()));
            let log = service.run(&jurisdiction).await?;
            Ok(serde_json::to_value(log).unwrap_or_default())
        }
    });
    Deployment::new("bills", "0 0 3 * * *", POOL_TAG)
        .with_default_params(serde_json::json!({ "jurisdiction": jurisdiction }))
        .with_task(TaskConfig::new("ingest_bills".to_string()), Arc::new(task))
}

fn politicians_deployment(db: Database, catalogue: Arc<HttpCatalogueClient>, jurisdiction: String) -> Deployment {
    let task = FnTask::new("ingest_politicians", move |params| {
        let db = db.clone();
        let catalogue = Arc::clone(&catalogue);
        async move {
            let jurisdiction = params["jurisdiction"].as_str().unwrap_or(&jurisdiction_default()).to_string();
            let service = PoliticianIngestService::new(&db, catalogue.as_ref());
            let log = service.run(&jurisdiction).await?;
            Ok(serde_json::to_value(log).unwrap_or_default())
        }
    });
    Deployment::new("politicians", "0 30 3 * * *", POOL_TAG)
        .with_default_params(serde_json::json!({ "jurisdiction": jurisdiction }))
        .with_task(TaskConfig::new("ingest_politicians".to_string()), Arc::new(task))
}

fn votes_deployment(db: Database, catalogue: Arc<HttpCatalogueClient>, jurisdiction: String) -> Deployment {
    let task = FnTask::new("ingest_votes", move |params| {
        let db = db.clone();
        let catalogue = Arc::clone(&catalogue);
        async move {
            let jurisdiction = params["jurisdiction"].as_str().unwrap_or(&jurisdiction_default()).to_string();
            let service = VoteIngestService::new(&db, catalogue.as_ref());
            let log = service.run(&jurisdiction).await?;
            Ok(serde_json::to_value(log).unwrap_or_default())
        }
    });
    Deployment::new("votes", "0 0 4 * * *", POOL_TAG)
        .with_default_params(serde_json::json!({ "jurisdiction": jurisdiction }))
        .with_task(TaskConfig::new("ingest_votes".to_string()), Arc::new(task))
}

fn committees_deployment(
    db: Database,
    catalogue: Arc<HttpCatalogueClient>,
    enrichment: Arc<HtmlEnrichmentClient>,
    jurisdiction: String,
) -> Deployment {
    let task = FnTask::new("ingest_committees", move |params| {
        let db = db.clone();
        let catalogue = Arc::clone(&catalogue);
        let enrichment = Arc::clone(&enrichment);
        async move {
            let jurisdiction = params["jurisdiction"].as_str().unwrap_or(&jurisdiction_default()).to_string();
            let parliament = params["parliament"].as_i64().unwrap_or(44) as i16;
            let session = params["session"].as_i64().unwrap_or(1) as i16;
            let service = CommitteeIngestService::new(&db, catalogue.as_ref(), Some(enrichment.as_ref()));
            let log = service.run(&jurisdiction, parliament, session).await?;
            Ok(serde_json::to_value(log).unwrap_or_default())
        }
    });
    Deployment::new("committees", "0 0 5 * * *", POOL_TAG)
        .with_default_params(serde_json::json!({ "jurisdiction": jurisdiction, "parliament": 44, "session": 1 }))
        .with_task(TaskConfig::new("ingest_committees".to_string()), Arc::new(task))
}

fn debates_deployment(db: Database, catalogue: Arc<HttpCatalogueClient>, jurisdiction: String) -> Deployment {
    let task = FnTask::new("ingest_debates", move |params| {
        let db = db.clone();
        let catalogue = Arc::clone(&catalogue);
        async move {
            let jurisdiction = params["jurisdiction"].as_str().unwrap_or(&jurisdiction_default()).to_string();
            let service = DebateIngestService::new(&db, catalogue.as_ref());
            let log = service.run(&jurisdiction).await?;
            Ok(serde_json::to_value(log).unwrap_or_default())
        }
    });
    Deployment::new("debates", "0 0 6 * * *", POOL_TAG)
        .with_default_params(serde_json::json!({ "jurisdiction": jurisdiction }))
        .with_task(TaskConfig::new("ingest_debates".to_string()), Arc::new(task))
}

fn jurisdiction_default() -> String {
    "ca-federal".to_string()
}
