//! Shared helpers used by every per-domain integration service.

use std::collections::HashMap;

/// Compresses a run's error list into "first N unique messages with counts",
/// per the fetch log contract. Order is first-seen.
pub fn summarize_errors(errors: &[String]) -> serde_json::Value {
    const MAX_UNIQUE: usize = 10;

    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for error in errors {
        let entry = counts.entry(error.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(error.as_str());
        }
        *entry += 1;
    }

    let summary: Vec<serde_json::Value> = order
        .into_iter()
        .take(MAX_UNIQUE)
        .map(|message| {
            serde_json::json!({
                "message": message,
                "count": counts[message],
            })
        })
        .collect();
    serde_json::Value::Array(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedupes_and_counts_preserving_first_seen_order() {
        let errors = vec!["timeout".to_string(), "parse error".to_string(), "timeout".to_string()];
        let summary = summarize_errors(&errors);
        let arr = summary.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["message"], "timeout");
        assert_eq!(arr[0]["count"], 2);
        assert_eq!(arr[1]["message"], "parse error");
        assert_eq!(arr[1]["count"], 1);
    }

    #[test]
    fn caps_at_ten_unique_messages() {
        let errors: Vec<String> = (0..20).map(|i| format!("error {i}")).collect();
        let summary = summarize_errors(&errors);
        assert_eq!(summary.as_array().unwrap().len(), 10);
    }
}
