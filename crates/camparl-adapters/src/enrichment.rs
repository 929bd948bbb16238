//! Enrichment adapter: scrapes the authoritative HTML site for fields the
//! catalogue source omits (bill subject tags, royal assent chapter,
//! full-text summaries, committee French names/acronyms).

use std::time::Duration;

use camparl_merger::{BillEnrichment, CommitteeEnrichment};
use chrono::Utc;
use scraper::{Html, Selector};

use crate::error::AdapterError;
use crate::rate_limit::SourceRateLimiter;
use crate::retry;

#[derive(Clone)]
pub struct HtmlEnrichmentClient {
    http: reqwest::Client,
    base_url: String,
    limiter: SourceRateLimiter,
    request_timeout: Duration,
    rate_limit_timeout: Duration,
}

impl HtmlEnrichmentClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, limiter: SourceRateLimiter, request_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            limiter,
            request_timeout,
            rate_limit_timeout: Duration::from_secs(30),
        }
    }

    async fn fetch_html(&self, path: &str) -> Result<String, AdapterError> {
        self.limiter.acquire(self.rate_limit_timeout).await?;
        let url = format!("{}{}", self.base_url, path);
        let response = retry::with_retry(|| async {
            self.http
                .get(&url)
                .timeout(self.request_timeout)
                .send()
                .await
                .map_err(AdapterError::from)
        })
        .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdapterError::from_status(status, body));
        }
        response.text().await.map_err(AdapterError::from)
    }

    /// Scrapes a bill's enrichment page for subject tags, royal assent
    /// chapter, and bilingual full-text summaries.
    ///
    /// Missing elements are not an error - each field is simply left empty,
    /// matching "fields only on the enrichment: add to result" for whatever
    /// the page does supply.
    ///
    /// # Errors
    /// Returns `AdapterError` if the page cannot be fetched at all.
    pub async fn bill_enrichment(&self, number: &str, parliament: i16, session: i16) -> Result<BillEnrichment, AdapterError> {
        let path = format!("/bills/{parliament}-{session}/{number}");
        let html = self.fetch_html(&path).await?;
        let document = Html::parse_document(&html);

        let subject_tags = select_all_text(&document, ".subject-tag");
        let summary_en = select_first_text(&document, ".summary-en");
        let summary_fr = select_first_text(&document, ".summary-fr");
        let royal_assent_chapter = select_first_text(&document, ".royal-assent-chapter");

        Ok(BillEnrichment {
            subject_tags,
            summary_en,
            summary_fr,
            royal_assent_chapter,
            fetched_at: Utc::now(),
        })
    }

    /// Scrapes a committee's enrichment page for its French name, acronym,
    /// and canonical source URL.
    ///
    /// # Errors
    /// Returns `AdapterError` if the page cannot be fetched at all.
    pub async fn committee_enrichment(&self, slug: &str, parliament: i16, session: i16) -> Result<CommitteeEnrichment, AdapterError> {
        let path = format!("/committees/{parliament}-{session}/{slug}");
        let html = self.fetch_html(&path).await?;
        let document = Html::parse_document(&html);

        Ok(CommitteeEnrichment {
            name_fr: select_first_text(&document, ".committee-name-fr"),
            acronym: select_first_text(&document, ".committee-acronym"),
            source_url: Some(format!("{}{path}", self.base_url)),
        })
    }
}

fn select_first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn select_all_text(document: &Html, selector: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_subject_tags_and_summary() {
        let html = r#"
            <html><body>
                <span class="subject-tag">Broadcasting</span>
                <span class="subject-tag">Media</span>
                <div class="summary-en">An act respecting broadcasting.</div>
                <div class="royal-assent-chapter">2023, c. 8</div>
            </body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(select_all_text(&document, ".subject-tag"), vec!["Broadcasting", "Media"]);
        assert_eq!(select_first_text(&document, ".summary-en").as_deref(), Some("An act respecting broadcasting."));
        assert_eq!(select_first_text(&document, ".royal-assent-chapter").as_deref(), Some("2023, c. 8"));
    }

    #[test]
    fn missing_elements_yield_empty_not_error() {
        let document = Html::parse_document("<html><body></body></html>");
        assert!(select_all_text(&document, ".subject-tag").is_empty());
        assert!(select_first_text(&document, ".summary-en").is_none());
    }
}
