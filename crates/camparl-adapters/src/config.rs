//! Adapter-wide configuration: base URLs and request timeout. Rate-limit
//! rates are fixed by the spec (catalogue 2 req/s burst 10, enrichment
//! 0.5 req/s burst 2) and not independently configurable per source
//! instance, though the bucket itself is constructed once and shared.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AdapterConfig {
    pub catalogue_base_url: String,
    pub enrichment_base_url: String,
    pub request_timeout: Duration,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            catalogue_base_url: "https://api.openparliament.ca".to_string(),
            enrichment_base_url: "https://www.ourcommons.ca".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AdapterConfig {
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalogue_base_url: std::env::var("ADAPTER_CATALOGUE_BASE_URL").unwrap_or(defaults.catalogue_base_url),
            enrichment_base_url: std::env::var("ADAPTER_ENRICHMENT_BASE_URL").unwrap_or(defaults.enrichment_base_url),
            request_timeout: std::env::var("ADAPTER_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }
}
