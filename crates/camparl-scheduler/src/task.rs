//! The dyn-safe unit of retryable work a deployment dispatches. Ordinary
//! adapter/pipeline code uses `impl Future` return position; a flow's task
//! list is heterogeneous and stored behind `Arc<dyn TaskHandler>`, so this
//! one seam boxes its future instead.

use std::future::Future;
use std::pin::Pin;

use crate::error::SchedulerError;

pub type TaskOutput = Result<serde_json::Value, SchedulerError>;

pub trait TaskHandler: Send + Sync {
    fn name(&self) -> &str;

    fn call<'a>(&'a self, params: &'a serde_json::Value) -> Pin<Box<dyn Future<Output = TaskOutput> + Send + 'a>>;
}

/// Wraps a plain async closure as a `TaskHandler`, for flows whose task is a
/// thin adapter over one `camparl-pipeline` service call.
pub struct FnTask<F> {
    name: &'static str,
    func: F,
}

impl<F> FnTask<F> {
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F, Fut> TaskHandler for FnTask<F>
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync,
    Fut: Future<Output = TaskOutput> + Send + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn call<'a>(&'a self, params: &'a serde_json::Value) -> Pin<Box<dyn Future<Output = TaskOutput> + Send + 'a>> {
        Box::pin((self.func)(params.clone()))
    }
}
