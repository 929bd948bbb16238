use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("adapter error: {0}")]
    Adapter(#[from] camparl_adapters::AdapterError),

    #[error("database error: {0}")]
    Db(#[from] camparl_db::DbError),
}
