//! Vote ingestion: catalogue pages, bill-number resolution to `bill_id`,
//! per-vote ballot expansion resolved to internal politician ids, batched
//! ballot upsert, one fetch log per run.

use std::time::Instant;

use camparl_adapters::votes::CatalogueVoteDto;
use camparl_adapters::{CatalogueClient, PageRequest};
use camparl_core::{FetchLog, VoteRecord};
use camparl_db::Database;
use futures::{StreamExt, stream};

use crate::PipelineError;
use crate::services::common::summarize_errors;
use tracing::{info, warn};

pub struct VoteIngestService<'a, C: CatalogueClient> {
    db: &'a Database,
    catalogue: &'a C,
}

impl<'a, C: CatalogueClient> VoteIngestService<'a, C> {
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
            let response = match self.catalogue.list_page::<CatalogueVoteDto>("votes", page).await {
                Ok(response) => response,
                Err(error) => {
                    warn!("votes fetch page failed: {error}");
                    errors.push(error.to_string());
                    break;
                }
            };
            let is_last = response.is_last_page(page);
            attempted += response.items.len() as i32;

            let outcomes = stream::iter(response.items)
                .map(|dto| self.ingest_one(jurisdiction, dto))
                .buffer_unordered(5)
                .collect::<Vec<_>>()
                .await;

            for outcome in outcomes {
                match outcome {
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
        let parameters = serde_json::json!({ "jurisdiction": jurisdiction });
        let log = FetchLog::new("votes".to_string(), attempted, succeeded, failed, duration_ms, parameters)
            .with_errors(summarize_errors(&errors));
        info!(attempted, succeeded, failed, "votes ingestion run complete");
        self.db.fetch_logs().record(&log).await?;
        Ok(log)
    }

    async fn ingest_one(&self, jurisdiction: &str, dto: CatalogueVoteDto) -> Result<(), PipelineError> {
        let bill_number = dto.bill_number.clone();
        let (parliament, session) = (dto.parliament, dto.session);
        let vote_id = format!("{parliament}-{session}-{}", dto.number);
        let mut vote = dto.into_domain(jurisdiction);

        if let Some(bill_number) = bill_number {
            vote.bill_id = self
                .db
                .bills()
                .get_by_natural_key(jurisdiction, parliament, session, &bill_number)
                .await?
                .map(|bill| bill.id);
        }

        // Ballots are resolved to internal politician ids up front, outside
        // the transaction, since that lookup is read-only and independent of
        // the vote row this call is about to upsert.
        let ballots = camparl_adapters::votes::fetch_ballots(self.catalogue, &vote_id).await?;
        let mut resolved = Vec::with_capacity(ballots.len());
        for ballot in ballots {
            let Some(politician) = self
                .db
                .politicians()
                .get_by_natural_key(jurisdiction, &ballot.politician_id)
                .await?
            else {
                continue;
            };
            resolved.push((politician.id, ballot));
        }

        let jurisdiction_owned = jurisdiction.to_string();
        let vote_id_owned = vote_id.clone();
        let persisted = self
            .db
            .transaction(move |tx| {
                Box::pin(async move {
                    camparl_db::VoteRepo::upsert_via(&mut *tx, &vote).await?;
                    let persisted = camparl_db::VoteRepo::get_by_natural_key_via(&mut *tx, &jurisdiction_owned, &vote_id_owned)
                        .await?
                        .ok_or_else(|| camparl_db::DbError::NotFound(format!("vote {vote_id_owned} after upsert")))?;

                    let records: Vec<VoteRecord> = resolved
                        .into_iter()
                        .map(|(politician_id, ballot)| {
                            let mut record =
                                VoteRecord::new(persisted.id, politician_id, ballot.normalized_position(), Some(ballot.position.clone()));
                            record.party_at_vote = ballot.party_at_vote.clone();
                            record
                        })
                        .collect();
                    camparl_db::VoteRecordRepo::upsert_many_via(&mut *tx, &records).await?;
                    Ok(persisted)
                })
            })
            .await?;

        let recorded_total = self.db.vote_records().total_for_vote(persisted.id).await?;
        let denormalized_total = i64::from(persisted.total_cast());
        if recorded_total != denormalized_total {
            warn!(
                vote_id = %persisted.vote_id,
                recorded_total,
                denormalized_total,
                "vote record count does not reconcile with vote's denormalized tallies"
            );
        }
        Ok(())
    }
}
