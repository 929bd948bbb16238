//! Runs embedded migrations to head. Idempotent - a second run against an
//! already-current schema is a no-op.

use color_eyre::eyre::Result;
use colored::Colorize;

use super::get_database;

pub async fn run() -> Result<()> {
    get_database().await?;
    println!("{}", "Migrations applied, schema at head.".green());
    Ok(())
}
