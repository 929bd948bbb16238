use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("database error: {0}")]
    Db(#[from] camparl_db::DbError),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] camparl_pipeline::PipelineError),

    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    #[error("task {task} failed after {attempts} attempts: {source}")]
    TaskExhausted { task: String, attempts: i32, source: String },

    #[error("startup check failed: {0}")]
    StartupCheck(String),

    #[error("invalid schedule expression: {0}")]
    InvalidSchedule(String),
}
