//! Data-driven flow registration.
//!
//! Replaces decorator-based scheduler metadata: a `Deployment` is a plain
//! struct built and registered at worker startup, not an attribute macro
//! over a function.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::task::TaskHandler;

/// Per-task retry and caching policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskConfig {
    pub name: String,
    pub retries: i32,
    pub retry_delay_secs: u64,
    /// `None` disables result caching for this task entirely.
    pub cache_ttl_secs: Option<u64>,
}

impl TaskConfig {
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            name,
            retries: 3,
            retry_delay_secs: 60,
            cache_ttl_secs: Some(3600),
        }
    }

    #[must_use]
    pub const fn without_cache(mut self) -> Self {
        self.cache_ttl_secs = None;
        self
    }

    #[must_use]
    pub const fn with_retries(mut self, retries: i32) -> Self {
        self.retries = retries;
        self
    }
}

/// (flow name, schedule spec, work-pool tag, default parameters), plus the
/// task list it dispatches. Registered by name at worker startup - no
/// attribute macros.
#[derive(Clone)]
pub struct Deployment {
    pub flow_id: String,
    pub schedule_expr: String,
    pub default_params: serde_json::Value,
    pub pool_tag: String,
    /// Serializes runs of this flow: a new scheduled run is not claimed
    /// while a prior run of the same flow is still in flight.
    pub exclusive: bool,
    pub task_configs: Vec<TaskConfig>,
    pub tasks: Vec<Arc<dyn TaskHandler>>,
}

impl Deployment {
    #[must_use]
    pub fn new(flow_id: impl Into<String>, schedule_expr: impl Into<String>, pool_tag: impl Into<String>) -> Self {
        Self {
            flow_id: flow_id.into(),
            schedule_expr: schedule_expr.into(),
            default_params: serde_json::Value::Object(serde_json::Map::new()),
            pool_tag: pool_tag.into(),
            exclusive: false,
            task_configs: Vec::new(),
            tasks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_default_params(mut self, params: serde_json::Value) -> Self {
        self.default_params = params;
        self
    }

    #[must_use]
    pub const fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    #[must_use]
    pub fn with_task(mut self, config: TaskConfig, handler: Arc<dyn TaskHandler>) -> Self {
        self.task_configs.push(config);
        self.tasks.push(handler);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_config_defaults_to_cached_with_three_retries() {
        let config = TaskConfig::new("ingest-bills".to_string());
        assert_eq!(config.retries, 3);
        assert_eq!(config.cache_ttl_secs, Some(3600));
    }

    #[test]
    fn without_cache_disables_caching_only() {
        let config = TaskConfig::new("ingest-votes".to_string()).without_cache().with_retries(5);
        assert_eq!(config.cache_ttl_secs, None);
        assert_eq!(config.retries, 5);
    }

    #[test]
    fn deployment_builder_is_not_exclusive_by_default() {
        let deployment = Deployment::new("flow", "0 * * * *", "default");
        assert!(!deployment.exclusive);
        assert!(deployment.task_configs.is_empty());
    }
}
