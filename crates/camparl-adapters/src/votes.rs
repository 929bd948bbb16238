//! Vote (division) catalogue adapter, including the per-vote ballot expansion.

use camparl_core::{Vote, VotePosition, VoteResult};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::bilingual::Bilingual;
use crate::catalogue::CatalogueClient;
use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueVoteDto {
    pub parliament: i16,
    pub session: i16,
    pub number: i32,
    pub vote_date: NaiveDate,
    pub chamber: String,
    pub description: Bilingual,
    pub result: String,
    pub yea_count: i32,
    pub nay_count: i32,
    pub abstain_count: i32,
    /// Natural bill number this division relates to, if any; resolved to a
    /// `bill_id` by the integration service, not here.
    pub bill_number: Option<String>,
}

impl CatalogueVoteDto {
    #[must_use]
    pub fn into_domain(self, jurisdiction: &str) -> Vote {
        let result = parse_result(&self.result);
        let mut vote = Vote::new(
            jurisdiction.to_string(),
            self.parliament,
            self.session,
            self.number,
            self.vote_date,
            self.chamber,
            result,
        )
        .with_counts(self.yea_count, self.nay_count, self.abstain_count);
        vote.description_en = self.description.en;
        vote.description_fr = self.description.fr;
        vote
    }
}

fn parse_result(raw: &str) -> VoteResult {
    match raw.to_lowercase().as_str() {
        "defeated" | "negatived" => VoteResult::Defeated,
        "tied" => VoteResult::Tied,
        _ => VoteResult::Passed,
    }
}

/// A single MP's ballot as reported by the source, natural-keyed by the
/// politician's source id rather than our internal `Uuid` - the integration
/// service resolves that id before writing a `VoteRecord`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueBallotDto {
    pub politician_id: String,
    pub position: String,
    pub party_at_vote: Option<String>,
}

impl CatalogueBallotDto {
    #[must_use]
    pub fn normalized_position(&self) -> VotePosition {
        VotePosition::normalize(&self.position)
    }
}

/// # Errors
/// Returns `AdapterError` if the request fails or the page cannot be parsed.
pub async fn fetch_votes_page(
    client: &impl CatalogueClient,
    jurisdiction: &str,
    page: PageRequest,
) -> Result<PagedResponse<Vote>, AdapterError> {
    let raw: PagedResponse<CatalogueVoteDto> = client.list_page("votes", page).await?;
    Ok(PagedResponse {
        items: raw.items.into_iter().map(|dto| dto.into_domain(jurisdiction)).collect(),
        total: raw.total,
        provenance: raw.provenance,
    })
}

/// Fetches every recorded ballot for one division.
///
/// # Errors
/// Returns `AdapterError` if the request fails or the response cannot be parsed.
pub async fn fetch_ballots(client: &impl CatalogueClient, vote_id: &str) -> Result<Vec<CatalogueBallotDto>, AdapterError> {
    client.detail("votes", &format!("{vote_id}/ballots")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_result_variants() {
        assert_eq!(parse_result("Passed"), VoteResult::Passed);
        assert_eq!(parse_result("Negatived"), VoteResult::Defeated);
        assert_eq!(parse_result("Tied"), VoteResult::Tied);
    }

    #[test]
    fn ballot_normalizes_raw_position() {
        let ballot = CatalogueBallotDto {
            politician_id: "123".into(),
            position: "Yes".into(),
            party_at_vote: Some("Liberal".into()),
        };
        assert_eq!(ballot.normalized_position(), VotePosition::Yea);
    }
}
