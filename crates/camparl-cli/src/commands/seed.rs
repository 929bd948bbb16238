//! Bootstraps a fresh database with one usable credential, so "boots
//! successfully in development mode" (§6) means something you can actually
//! call `/api/v1/*` with, not just an empty schema.

use camparl_core::ApiKey;
use color_eyre::eyre::Result;
use colored::Colorize;

use super::get_database;
use crate::commands::keys::{generate_raw_key, hash_key};

pub async fn run() -> Result<()> {
    let db = get_database().await?;

    if !db.api_keys().list().await?.is_empty() {
        println!("{}", "Database already has API keys, nothing to seed.".dimmed());
        return Ok(());
    }

    let raw = generate_raw_key();
    let hash = hash_key(&raw);
    let key = ApiKey::new("dev-seed".to_string(), hash, 10_000);
    db.api_keys().create(&key).await?;

    println!("{}", "Seeded a development API key:".green().bold());
    println!("  {raw}");
    println!("{}", "This is the only time the raw key is shown - store it now.".dimmed());
    Ok(())
}
