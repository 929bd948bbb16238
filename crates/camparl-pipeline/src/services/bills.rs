//! Bill ingestion: catalogue pages, optional HTML enrichment merge, batched
//! upsert, one fetch log per run.

use std::time::Instant;

use camparl_adapters::{CatalogueClient, HtmlEnrichmentClient, PageRequest, bills as bill_adapter};
use camparl_core::FetchLog;
use camparl_db::Database;
use camparl_merger::merge_bill;
use futures::{StreamExt, stream};

use crate::PipelineError;
use crate::services::common::summarize_errors;
use tracing::{info, warn};

pub struct BillIngestService<'a, C: CatalogueClient> {
    db: &'a Database,
    catalogue: &'a C,
    enrichment: Option<&'a HtmlEnrichmentClient>,
}

impl<'a, C: CatalogueClient> BillIngestService<'a, C> {
    #[must_use]
    pub const fn new(db: &'a Database, catalogue: &'a C, enrichment: Option<&'a HtmlEnrichmentClient>) -> Self {
        Self { db, catalogue, enrichment }
    }

    /// Pages through the bill catalogue for one jurisdiction, enriching and
    /// upserting each page, and records the outcome as a fetch log.
    ///
    /// # Errors
    /// Returns `PipelineError` only if writing the fetch log itself fails;
    /// per-page/per-record failures are absorbed into the log's counts.
    pub async fn run(&self, jurisdiction: &str) -> Result<FetchLog, PipelineError> {
        let started = Instant::now();
        let mut page = PageRequest::first_page();
        let mut attempted = 0i32;
        let mut succeeded = 0i32;
        let mut failed = 0i32;
        let mut errors: Vec<String> = Vec::new();

        let mut enrichment_attempted = 0i32;
        let mut enrichment_succeeded = 0i32;
        let mut enrichment_failed = 0i32;
        let mut enrichment_errors: Vec<String> = Vec::new();

        loop {
            let response = match bill_adapter::fetch_bills_page(self.catalogue, jurisdiction, page).await {
                Ok(response) => response,
                Err(error) => {
                    warn!("bills fetch page failed: {error}");
                    errors.push(error.to_string());
                    break;
                }
            };
            let is_last = response.is_last_page(page);
            attempted += response.items.len() as i32;

            let enriched: Vec<_> = stream::iter(response.items)
                .map(|bill| async move {
                    let Some(enrichment) = self.enrichment else {
                        return (bill, None);
                    };
                    enrichment_attempted_for(bill, enrichment).await
                })
                .buffer_unordered(5)
                .collect()
                .await;

            for (_, outcome) in &enriched {
                match outcome {
                    Some(Ok(())) => {
                        enrichment_attempted += 1;
                        enrichment_succeeded += 1;
                    }
                    Some(Err(natural_key)) => {
                        enrichment_attempted += 1;
                        enrichment_failed += 1;
                        enrichment_errors.push(natural_key.clone());
                    }
                    None => {}
                }
            }
            let enriched: Vec<_> = enriched.into_iter().map(|(bill, _)| bill).collect();

            match self.db.bills().upsert_many(&enriched).await {
                Ok((created, updated)) => succeeded += (created + updated) as i32,
                Err(error) => {
                    failed += enriched.len() as i32;
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
        let log = FetchLog::new("bills".to_string(), attempted, succeeded, failed, duration_ms, parameters)
            .with_errors(summarize_errors(&errors));
        info!(attempted, succeeded, failed, "bills ingestion run complete");
        self.db.fetch_logs().record(&log).await?;

        if self.enrichment.is_some() {
            let enrichment_parameters = serde_json::json!({ "jurisdiction": jurisdiction });
            let enrichment_log = FetchLog::new(
                "bills_enrichment".to_string(),
                enrichment_attempted,
                enrichment_succeeded,
                enrichment_failed,
                duration_ms,
                enrichment_parameters,
            )
            .with_errors(summarize_errors(&enrichment_errors));
            info!(
                attempted = enrichment_attempted,
                succeeded = enrichment_succeeded,
                failed = enrichment_failed,
                "bills enrichment fetch complete"
            );
            self.db.fetch_logs().record(&enrichment_log).await?;
        }

        Ok(log)
    }
}

/// Fetches one bill's enrichment record and merges it in, reporting the
/// natural key as the error on failure so the enrichment fetch log can name
/// exactly which bills it could not enrich.
async fn enrichment_attempted_for(
    bill: camparl_core::Bill,
    enrichment: &HtmlEnrichmentClient,
) -> (camparl_core::Bill, Option<Result<(), String>>) {
    let natural_key = format!("{}-{}-{}", bill.parliament, bill.session, bill.number);
    match enrichment.bill_enrichment(&bill.number, bill.parliament, bill.session).await {
        Ok(data) => (merge_bill(bill, Some(data)), Some(Ok(()))),
        Err(error) => {
            warn!("bill {natural_key} enrichment fetch failed: {error}");
            (bill, Some(Err(natural_key)))
        }
    }
}
