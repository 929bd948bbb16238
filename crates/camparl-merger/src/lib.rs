//! Pure enrichment-merge policy
//!
//! Combines a primary (catalogue) record with an optional enrichment (HTML
//! scrape) record sharing the same natural key. No I/O; every function here
//! is a plain `fn(primary, enrichment) -> primary` and is unit-tested
//! directly. Repositories must not re-implement this precedence.

use camparl_core::{Bill, Committee};
use chrono::{DateTime, Utc};

/// Fields an enrichment source contributes for a bill that the catalogue
/// source often omits: subject tags, full-text summaries, royal assent
/// chapter number.
#[derive(Debug, Clone, Default)]
pub struct BillEnrichment {
    pub subject_tags: Vec<String>,
    pub summary_en: Option<String>,
    pub summary_fr: Option<String>,
    pub royal_assent_chapter: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// Fields an enrichment source contributes for a committee: the French name
/// and acronym are frequently missing from the catalogue feed.
#[derive(Debug, Clone, Default)]
pub struct CommitteeEnrichment {
    pub name_fr: Option<String>,
    pub acronym: Option<String>,
    pub source_url: Option<String>,
}

/// Merges a primary bill with an optional enrichment record.
///
/// Primary wins on every field it supplies; enrichment fills gaps (null or
/// empty primary fields) and its own stamp becomes `last_enriched_at`.
/// `subject_tags` unions both sources with stable de-duplication.
/// `source_primary` is always true (this function only runs on a record a
/// catalogue fetch produced); `source_enrichment` flips to true the first
/// time an enrichment record is merged in and stays true afterward.
#[must_use]
pub fn merge_bill(mut primary: Bill, enrichment: Option<BillEnrichment>) -> Bill {
    primary.source_primary = true;

    let Some(enrichment) = enrichment else {
        return primary;
    };

    primary.summary_en = primary.summary_en.filter(|s| !s.is_empty()).or(enrichment.summary_en);
    primary.summary_fr = primary.summary_fr.filter(|s| !s.is_empty()).or(enrichment.summary_fr);
    primary.royal_assent_chapter = primary
        .royal_assent_chapter
        .filter(|s| !s.is_empty())
        .or(enrichment.royal_assent_chapter);
    primary.subject_tags = union_dedup(&primary.subject_tags, &enrichment.subject_tags);
    primary.source_enrichment = true;
    primary.last_enriched_at = Some(enrichment.fetched_at);

    primary
}

/// Merges a primary committee with an optional enrichment record.
#[must_use]
pub fn merge_committee(mut primary: Committee, enrichment: Option<CommitteeEnrichment>) -> Committee {
    let Some(enrichment) = enrichment else {
        return primary;
    };

    primary.name_fr = primary.name_fr.filter(|s| !s.is_empty()).or(enrichment.name_fr);
    primary.acronym = primary.acronym.filter(|s| !s.is_empty()).or(enrichment.acronym);
    primary.source_url = primary.source_url.filter(|s| !s.is_empty()).or(enrichment.source_url);

    primary
}

/// Unions two string slices preserving first-seen order, case-insensitively
/// de-duplicated on the canonical (lowercased, trimmed) value.
fn union_dedup(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(a.len() + b.len());
    for item in a.iter().chain(b.iter()) {
        let canonical = item.trim().to_lowercase();
        if canonical.is_empty() || !seen.insert(canonical) {
            continue;
        }
        out.push(item.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bill() -> Bill {
        Bill::new("ca-federal".into(), 44, 1, "C-11".into())
    }

    #[test]
    fn primary_wins_when_present() {
        let mut primary = sample_bill();
        primary.summary_en = Some("Primary summary".into());
        let enrichment = BillEnrichment {
            summary_en: Some("Enrichment summary".into()),
            fetched_at: Utc::now(),
            ..Default::default()
        };
        let merged = merge_bill(primary, Some(enrichment));
        assert_eq!(merged.summary_en.as_deref(), Some("Primary summary"));
    }

    #[test]
    fn enrichment_fills_gap() {
        let primary = sample_bill();
        let enrichment = BillEnrichment {
            summary_en: Some("Enrichment summary".into()),
            fetched_at: Utc::now(),
            ..Default::default()
        };
        let merged = merge_bill(primary, Some(enrichment));
        assert_eq!(merged.summary_en.as_deref(), Some("Enrichment summary"));
    }

    #[test]
    fn subject_tags_union_with_dedup() {
        let mut primary = sample_bill();
        primary.subject_tags = vec!["Broadcasting".into(), "Media".into()];
        let enrichment = BillEnrichment {
            subject_tags: vec!["media".into(), "Telecommunications".into()],
            fetched_at: Utc::now(),
            ..Default::default()
        };
        let merged = merge_bill(primary, Some(enrichment));
        assert_eq!(
            merged.subject_tags,
            vec!["Broadcasting".to_string(), "Media".to_string(), "Telecommunications".to_string()]
        );
    }

    #[test]
    fn no_enrichment_is_a_no_op() {
        let primary = sample_bill();
        let merged = merge_bill(primary.clone(), None);
        assert_eq!(merged.subject_tags, primary.subject_tags);
        assert!(merged.last_enriched_at.is_none());
    }

    #[test]
    fn source_flags_reflect_which_sources_contributed() {
        let without_enrichment = merge_bill(sample_bill(), None);
        assert!(without_enrichment.source_primary);
        assert!(!without_enrichment.source_enrichment);

        let with_enrichment = merge_bill(
            sample_bill(),
            Some(BillEnrichment {
                fetched_at: Utc::now(),
                ..Default::default()
            }),
        );
        assert!(with_enrichment.source_primary);
        assert!(with_enrichment.source_enrichment);
    }

    #[test]
    fn last_enriched_at_reflects_enrichment_fetch() {
        let primary = sample_bill();
        let fetched_at = Utc::now();
        let merged = merge_bill(
            primary,
            Some(BillEnrichment {
                fetched_at,
                ..Default::default()
            }),
        );
        assert_eq!(merged.last_enriched_at, Some(fetched_at));
    }
}
