//! Catalogue adapter: a paginated JSON list/detail client shared by every
//! per-domain fetch module (bills, politicians, votes, committees, debates).

use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::AdapterError;
use crate::pagination::{PageRequest, PagedResponse};
use crate::provenance::Provenance;
use crate::rate_limit::SourceRateLimiter;
use crate::retry;

/// Exposes paginated list and per-id detail fetches against one JSON catalogue API.
pub trait CatalogueClient: Send + Sync {
    fn list_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        page: PageRequest,
    ) -> impl Future<Output = Result<PagedResponse<T>, AdapterError>> + Send;

    fn detail<T: DeserializeOwned>(
        &self,
        resource: &str,
        id: &str,
    ) -> impl Future<Output = Result<T, AdapterError>> + Send;
}

/// The upstream's list envelope - `{results: [...], count: <total>?}`. Most
/// catalogue APIs in this domain either report a total or omit it entirely.
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    results: Vec<T>,
    count: Option<u64>,
}

/// `reqwest`-backed catalogue client. Holds the shared rate-limit bucket so
/// every adapter instance constructed against the same source coordinates
/// through one `Arc`.
#[derive(Clone)]
pub struct HttpCatalogueClient {
    http: reqwest::Client,
    base_url: String,
    limiter: SourceRateLimiter,
    request_timeout: Duration,
    rate_limit_timeout: Duration,
}

impl HttpCatalogueClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, limiter: SourceRateLimiter, request_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            limiter,
            request_timeout,
            rate_limit_timeout: Duration::from_secs(10),
        }
    }

    async fn get(&self, path: &str) -> Result<(Bytes, Provenance), AdapterError> {
        self.limiter.acquire(self.rate_limit_timeout).await?;
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::from_status(status, body));
        }
        let body = response.bytes().await?;
        let provenance = Provenance::new(url, &body);
        Ok((body, provenance))
    }
}

impl CatalogueClient for HttpCatalogueClient {
    async fn list_page<T: DeserializeOwned>(
        &self,
        resource: &str,
        page: PageRequest,
    ) -> Result<PagedResponse<T>, AdapterError> {
        let path = format!("/{resource}?limit={}&offset={}", page.limit, page.offset);
        let (body, provenance) = retry::with_retry(|| self.get(&path)).await?;
        let envelope: ListEnvelope<T> = serde_json::from_slice(&body)
            .map_err(|e| AdapterError::Terminal(format!("parsing {resource} list: {e}")))?;
        Ok(PagedResponse {
            items: envelope.results,
            total: envelope.count,
            provenance,
        })
    }

    async fn detail<T: DeserializeOwned>(&self, resource: &str, id: &str) -> Result<T, AdapterError> {
        let path = format!("/{resource}/{id}");
        let (body, _provenance) = retry::with_retry(|| self.get(&path)).await?;
        serde_json::from_slice(&body).map_err(|e| AdapterError::Terminal(format!("parsing {resource} detail: {e}")))
    }
}
