//! In-process task-result cache. Backed by the durable `task_runs.cache_key`
//! lookup (`camparl_db::TaskRunRepo::find_cached`) for correctness across
//! worker restarts; this layer only saves a round trip for the common case
//! of a hot worker re-running the same task shortly after.

use std::time::Duration;

use moka::sync::Cache;
use sha2::{Digest, Sha256};

#[derive(Clone)]
pub struct TaskResultCache {
    inner: Cache<String, serde_json::Value>,
}

impl TaskResultCache {
    #[must_use]
    pub fn new(max_capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(Duration::from_secs(3600))
                .build(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.inner.get(key)
    }

    pub fn insert(&self, key: String, value: serde_json::Value) {
        self.inner.insert(key, value);
    }
}

/// Derives a stable cache key from a task's name and its hashed input
/// parameters, per the "hashed tuple of inputs" rule.
#[must_use]
pub fn cache_key(task_name: &str, params: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(task_name.as_bytes());
    hasher.update(params.to_string().as_bytes());
    format!("{task_name}:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_produce_the_same_key() {
        let params = serde_json::json!({ "jurisdiction": "ca-federal" });
        assert_eq!(cache_key("bills", &params), cache_key("bills", &params));
    }

    #[test]
    fn different_task_names_produce_different_keys() {
        let params = serde_json::json!({ "jurisdiction": "ca-federal" });
        assert_ne!(cache_key("bills", &params), cache_key("votes", &params));
    }
}
