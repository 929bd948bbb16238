//! Committee ingestion: catalogue pages for one parliament/session, optional
//! HTML enrichment merge, per-committee meeting expansion, one fetch log per run.

use std::time::Instant;

use camparl_adapters::{CatalogueClient, HtmlEnrichmentClient, PageRequest, committees as committee_adapter};
use camparl_core::{Committee, FetchLog};
use camparl_db::{CommitteeMeetingRepo, CommitteeRepo, Database};
use camparl_merger::merge_committee;
use futures::{StreamExt, stream};

use crate::PipelineError;
use crate::services::common::summarize_errors;
use tracing::{info, warn};

pub struct CommitteeIngestService<'a, C: CatalogueClient> {
    db: &'a Database,
    catalogue: &'a C,
    enrichment: Option<&'a HtmlEnrichmentClient>,
}

impl<'a, C: CatalogueClient> CommitteeIngestService<'a, C> {
    #[must_use]
    pub const fn new(db: &'a Database, catalogue: &'a C, enrichment: Option<&'a HtmlEnrichmentClient>) -> Self {
        Self { db, catalogue, enrichment }
    }

    /// # Errors
    /// Returns `PipelineError` only if writing the fetch log itself fails.
    pub async fn run(&self, jurisdiction: &str, parliament: i16, session: i16) -> Result<FetchLog, PipelineError> {
        let started = Instant::now();
        let mut page = PageRequest::first_page();
        let mut attempted = 0i32;
        let mut succeeded = 0i32;
        let mut failed = 0i32;
        let mut errors: Vec<String> = Vec::new();

        loop {
            let response = match committee_adapter::fetch_committees_page(self.catalogue, jurisdiction, parliament, session, page).await
            {
                Ok(response) => response,
                Err(error) => {
                    warn!("committees fetch page failed: {error}");
                    errors.push(error.to_string());
                    break;
                }
            };
            let is_last = response.is_last_page(page);
            attempted += response.items.len() as i32;

            let enriched: Vec<_> = stream::iter(response.items)
                .map(|committee| async move {
                    let Some(enrichment) = self.enrichment else {
                        return committee;
                    };
                    match enrichment.committee_enrichment(&committee.slug, parliament, session).await {
                        Ok(data) => merge_committee(committee, Some(data)),
                        Err(_) => committee,
                    }
                })
                .buffer_unordered(5)
                .collect()
                .await;

            for committee in &enriched {
                match self.ingest_committee(committee, parliament, session).await {
                    Ok(()) => succeeded += 1,
                    Err(error) => {
                        failed += 1;
                        errors.push(error.to_string());
                    }
                }
            }

            if is_last {
                break;
            }
            page = page.next();
        }

        let duration_ms = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);
        let parameters = serde_json::json!({ "jurisdiction": jurisdiction, "parliament": parliament, "session": session });
        let log = FetchLog::new("committees".to_string(), attempted, succeeded, failed, duration_ms, parameters)
            .with_errors(summarize_errors(&errors));
        info!(attempted, succeeded, failed, "committees ingestion run complete");
        self.db.fetch_logs().record(&log).await?;
        Ok(log)
    }

    /// Upserts a committee and all of its scheduled meetings in one
    /// transaction, so a meeting never ends up referencing a committee row
    /// that a conflicting natural key swapped out from under it.
    async fn ingest_committee(&self, committee: &Committee, parliament: i16, session: i16) -> Result<(), PipelineError> {
        let meetings = committee_adapter::fetch_meetings(self.catalogue, &committee.slug, parliament, session).await?;
        let jurisdiction = committee.jurisdiction.clone();
        let slug = committee.slug.clone();
        let committee = committee.clone();

        self.db
            .transaction(move |tx| {
                Box::pin(async move {
                    CommitteeRepo::upsert_via(&mut *tx, &committee).await?;
                    let persisted = CommitteeRepo::get_by_natural_key_via(&mut *tx, &jurisdiction, parliament, session, &slug)
                        .await?
                        .ok_or_else(|| camparl_db::DbError::NotFound(format!("committee {slug} after upsert")))?;
                    for dto in meetings {
                        let meeting = dto.into_domain(persisted.id, parliament, session);
                        CommitteeMeetingRepo::upsert_via(&mut *tx, &meeting).await?;
                    }
                    Ok(())
                })
            })
            .await?;
        Ok(())
    }
}
