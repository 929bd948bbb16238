//! Stable GUID construction for feed items.

use chrono::NaiveDate;

/// Builds the GUID for a feed item: same logical event yields the same
/// string across rebuilds, which is what lets feed readers dedupe.
#[must_use]
pub fn build(jurisdiction: &str, entity_type: &str, natural_id: &str, event_kind: &str, event_date: NaiveDate) -> String {
    format!("{jurisdiction}:{entity_type}:{natural_id}:{event_kind}:{event_date}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_across_rebuilds() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let a = build("ca-federal", "bill", "44-1-C-11", "introduced", date);
        let b = build("ca-federal", "bill", "44-1-C-11", "introduced", date);
        assert_eq!(a, b);
    }

    #[test]
    fn distinguishes_event_kind_and_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid date");
        let d2 = NaiveDate::from_ymd_opt(2024, 3, 2).expect("valid date");
        let introduced = build("ca-federal", "bill", "44-1-C-11", "introduced", d1);
        let assented = build("ca-federal", "bill", "44-1-C-11", "royal_assent", d1);
        let later = build("ca-federal", "bill", "44-1-C-11", "introduced", d2);
        assert_ne!(introduced, assented);
        assert_ne!(introduced, later);
    }
}
