//! Bill catalogue adapter: the JSON shape returned by the list/detail
//! endpoints, and its conversion into the domain `Bill`.

use camparl_core::Bill;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::bilingual::Bilingual;
use crate::catalogue::CatalogueClient;
use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogueBillDto {
    pub parliament: i16,
    pub session: i16,
    pub number: String,
    pub title: Bilingual,
    pub sponsor_politician_id: Option<String>,
    pub introduced_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub royal_assent_date: Option<NaiveDate>,
}

impl CatalogueBillDto {
    /// Converts the wire shape into a domain `Bill` rooted in the given jurisdiction.
    #[must_use]
    pub fn into_domain(self, jurisdiction: &str) -> Bill {
        let mut bill = Bill::new(jurisdiction.to_string(), self.parliament, self.session, self.number);
        bill.title_en = self.title.en;
        bill.title_fr = self.title.fr;
        bill.introduced_date = self.introduced_date;
        bill.royal_assent_date = self.royal_assent_date;
        if let Some(status) = self.status {
            bill.status = status;
        }
        bill
    }
}

/// Fetches one page of bills from the catalogue source.
///
/// # Errors
/// Returns `AdapterError` if the request fails or the page cannot be parsed.
pub async fn fetch_bills_page(
    client: &impl CatalogueClient,
    jurisdiction: &str,
    page: PageRequest,
) -> Result<PagedResponse<Bill>, AdapterError> {
    let raw: PagedResponse<CatalogueBillDto> = client.list_page("bills", page).await?;
    Ok(PagedResponse {
        items: raw.items.into_iter().map(|dto| dto.into_domain(jurisdiction)).collect(),
        total: raw.total,
        provenance: raw.provenance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_bilingual_title_and_defaults() {
        let dto = CatalogueBillDto {
            parliament: 44,
            session: 1,
            number: "C-11".into(),
            title: Bilingual {
                en: Some("Online Streaming Act".into()),
                fr: None,
            },
            sponsor_politician_id: None,
            introduced_date: NaiveDate::from_ymd_opt(2022, 2, 2),
            status: Some("royal_assent".into()),
            royal_assent_date: NaiveDate::from_ymd_opt(2023, 4, 27),
        };
        let bill = dto.into_domain("ca-federal");
        assert_eq!(bill.title_en.as_deref(), Some("Online Streaming Act"));
        assert!(bill.title_fr.is_none());
        assert_eq!(bill.status, "royal_assent");
        assert!(bill.has_royal_assent());
    }
}
