//! Flow/task/deployment runtime: a cron layer that creates `FlowRun` rows
//! (`scheduling`) and a worker that claims and executes them (`worker`).
//! Flows are registered as data (`Deployment`), not attribute macros, so a
//! new ingestion flow is a value pushed onto a `Vec<Deployment>`, not a new
//! function signature the runtime has to special-case.

mod cache;
mod deployment;
mod deployments;
mod error;
mod scheduling;
mod task;
mod worker;

pub use cache::{TaskResultCache, cache_key};
pub use deployment::{Deployment, TaskConfig};
pub use deployments::default_deployments;
pub use error::SchedulerError;
pub use scheduling::start as start_scheduling;
pub use task::{FnTask, TaskHandler, TaskOutput};
pub use worker::Worker;
