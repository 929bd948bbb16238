pub mod ingest;
pub mod keys;
pub mod migrate;
pub mod seed;
pub mod serve;
pub mod worker;

use camparl_db::Database;
use color_eyre::eyre::{Result, WrapErr};
use std::env;

/// Connects to `DATABASE_URL`, running embedded migrations to head.
pub async fn get_database() -> Result<Database> {
    let url = env::var("DATABASE_URL").wrap_err("DATABASE_URL is not set")?;
    let db = Database::connect(&url).await.wrap_err("failed to connect to the database")?;
    Ok(db)
}
