//! Politician catalogue adapter

use camparl_core::Politician;
use serde::Deserialize;

use crate::catalogue::CatalogueClient;
use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};

#[derive(Debug, Clone, Deserialize)]
pub struct CataloguePoliticianDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub current_party: Option<String>,
    pub current_riding: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub memberships: serde_json::Value,
}

impl CataloguePoliticianDto {
    #[must_use]
    pub fn into_domain(self, jurisdiction: &str) -> Politician {
        let mut politician = Politician::new(jurisdiction.to_string(), self.id, self.first_name, self.last_name);
        politician.current_party = self.current_party;
        politician.current_riding = self.current_riding;
        politician.photo_url = self.photo_url;
        if self.memberships.is_array() {
            politician.memberships = self.memberships;
        }
        politician
    }
}

/// # Errors
/// Returns `AdapterError` if the request fails or the page cannot be parsed.
pub async fn fetch_politicians_page(
    client: &impl CatalogueClient,
    jurisdiction: &str,
    page: PageRequest,
) -> Result<PagedResponse<Politician>, AdapterError> {
    let raw: PagedResponse<CataloguePoliticianDto> = client.list_page("politicians", page).await?;
    Ok(PagedResponse {
        items: raw.items.into_iter().map(|dto| dto.into_domain(jurisdiction)).collect(),
        total: raw.total,
        provenance: raw.provenance,
    })
}
