//! Politician ingestion: catalogue pages, batched upsert, one fetch log per run.

use std::time::Instant;

use camparl_adapters::{CatalogueClient, PageRequest, politicians as politician_adapter};
use camparl_core::FetchLog;
use camparl_db::Database;

use crate::PipelineError;
use crate::services::common::summarize_errors;
use tracing::{info, warn};

pub struct PoliticianIngestService<'a, C: CatalogueClient> {
    db: &'a Database,
    catalogue: &'a C,
}

impl<'a, C: CatalogueClient> PoliticianIngestService<'a, C> {
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
            let response = match politician_adapter::fetch_politicians_page(self.catalogue, jurisdiction, page).await {
                Ok(response) => response,
                Err(error) => {
                    warn!("politicians fetch page failed: {error}");
                    errors.push(error.to_string());
                    break;
                }
            };
            let is_last = response.is_last_page(page);
            attempted += response.items.len() as i32;

            match self.db.politicians().upsert_many(&response.items).await {
                Ok((created, updated)) => succeeded += (created + updated) as i32,
                Err(error) => {
                    failed += response.items.len() as i32;
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
        let log = FetchLog::new("politicians".to_string(), attempted, succeeded, failed, duration_ms, parameters)
            .with_errors(summarize_errors(&errors));
        info!(attempted, succeeded, failed, "politicians ingestion run complete");
        self.db.fetch_logs().record(&log).await?;
        Ok(log)
    }
}
