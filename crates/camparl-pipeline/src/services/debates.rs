//! Debate ingestion: catalogue pages, per-debate speech expansion with
//! speaker resolution to internal politician ids, one fetch log per run.

use std::time::Instant;

use camparl_adapters::{CatalogueClient, PageRequest, debates as debate_adapter};
use camparl_core::FetchLog;
use camparl_db::Database;

use crate::PipelineError;
use crate::services::common::summarize_errors;
use tracing::{info, warn};

pub struct DebateIngestService<'a, C: CatalogueClient> {
    db: &'a Database,
    catalogue: &'a C,
}

impl<'a, C: CatalogueClient> DebateIngestService<'a, C> {
    #[must_use]
    pub const fn new(db: &'a Database, catalogue: &'a C) -> Self {
        Self { db, catalogue }
    }

    /// # Errors
    /// Returns `PipelineError` only if writing the fetch log itself fails.
    pub async fn run(&self, jurisdiction: &str) -> Result<FetchLog, PipelineError> {
        let started = Instant::now();
        let mut page = PageRequest::first_page();
        let mut attempted = 0i32;
        let mut succeeded = 0i32;
        let mut failed = 0i32;
        let mut errors: Vec<String> = Vec::new();

        loop {
            let response = match debate_adapter::fetch_debates_page(self.catalogue, jurisdiction, page).await {
                Ok(response) => response,
                Err(error) => {
                    warn!("debates fetch page failed: {error}");
                    errors.push(error.to_string());
                    break;
                }
            };
            let is_last = response.is_last_page(page);
            attempted += response.items.len() as i32;

            match self.db.debates().upsert_many(&response.items).await {
                Ok((created, updated)) => succeeded += (created + updated) as i32,
                Err(error) => {
                    failed += response.items.len() as i32;
                    errors.push(error.to_string());
                }
            }

            for debate in &response.items {
                let persisted = match self.db.debates().get_by_natural_key(jurisdiction, &debate.hansard_id).await {
                    Ok(Some(persisted)) => persisted,
                    Ok(None) => continue,
                    Err(error) => {
                        errors.push(error.to_string());
                        continue;
                    }
                };
                if let Err(error) = self.ingest_speeches(jurisdiction, &persisted).await {
                    errors.push(error.to_string());
                }
            }

            if is_last {
                break;
            }
            page = page.next();
        }

        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let parameters = serde_json::json!({ "jurisdiction": jurisdiction });
        let log = FetchLog::new("debates".to_string(), attempted, succeeded, failed, duration_ms, parameters)
            .with_errors(summarize_errors(&errors));
        info!(attempted, succeeded, failed, "debates ingestion run complete");
        self.db.fetch_logs().record(&log).await?;
        Ok(log)
    }

    async fn ingest_speeches(&self, jurisdiction: &str, debate: &camparl_core::Debate) -> Result<(), PipelineError> {
        let speeches = debate_adapter::fetch_speeches(self.catalogue, &debate.hansard_id).await?;
        let mut resolved = Vec::with_capacity(speeches.len());
        for dto in speeches {
            let politician_id = match &dto.politician_id {
                Some(source_id) => self
                    .db
                    .politicians()
                    .get_by_natural_key(jurisdiction, source_id)
                    .await?
                    .map(|politician| politician.id),
                None => None,
            };
            let mut speech = dto.into_domain(debate.id);
            speech.politician_id = politician_id;
            resolved.push(speech);
        }
        self.db.speeches().upsert_many(&resolved).await?;
        Ok(())
    }
}
