//! API key lifecycle management. §4.9 scopes these endpoints as "admin-scoped;
//! out of scope here but contractually exist" for the HTTP API - the CLI is
//! where that contract is actually exercised.

use camparl_core::ApiKey;
use clap::Subcommand;
use color_eyre::eyre::{Result, eyre};
use colored::Colorize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::get_database;

#[derive(Subcommand)]
pub enum Action {
    /// Create a new key. The raw key is printed once and never stored.
    Create {
        name: String,
        #[arg(long, default_value = "1000")]
        requests_per_hour: i32,
    },
    /// List every key (hashes only - raw keys are unrecoverable).
    List,
    /// Show one key's usage counters.
    Usage { id: Uuid },
    /// Change a key's hourly request limit.
    UpdateLimit { id: Uuid, requests_per_hour: i32 },
    /// Deactivate a key without deleting it.
    Deactivate { id: Uuid },
    /// Reactivate a previously deactivated key.
    Reactivate { id: Uuid },
    /// Permanently delete a key.
    Delete { id: Uuid },
}

/// Two concatenated UUIDv7s, same construction as the personalization feed
/// token (§4.10) - well above any reasonable entropy floor for a bearer key.
#[must_use]
pub fn generate_raw_key() -> String {
    format!("{}{}", Uuid::now_v7().simple(), Uuid::now_v7().simple())
}

#[must_use]
pub fn hash_key(raw: &str) -> String {
    format!("{:x}", Sha256::digest(raw.as_bytes()))
}

pub async fn run(action: Action) -> Result<()> {
    let db = get_database().await?;

    match action {
        Action::Create { name, requests_per_hour } => {
            let raw = generate_raw_key();
            let key = ApiKey::new(name, hash_key(&raw), requests_per_hour);
            db.api_keys().create(&key).await?;
            println!("{} {}", "Created key:".green().bold(), key.id);
            println!("  {raw}");
            println!("{}", "This is the only time the raw key is shown.".dimmed());
        }
        Action::List => {
            let keys = db.api_keys().list().await?;
            if keys.is_empty() {
                println!("{}", "No API keys.".dimmed());
            }
            for key in keys {
                let status = if key.is_active { "active".green() } else { "inactive".red() };
                println!(
                    "{}  {:<20}  {}  {}/hr  {} requests",
                    key.id, key.name, status, key.requests_per_hour, key.request_count
                );
            }
        }
        Action::Usage { id } => {
            let key = db.api_keys().get(id).await?.ok_or_else(|| eyre!("no API key with id {id}"))?;
            println!("{} {}", "name:".dimmed(), key.name);
            println!("{} {}/hr", "limit:".dimmed(), key.requests_per_hour);
            println!("{} {}", "requests:".dimmed(), key.request_count);
            println!("{} {}", "last_used:".dimmed(), key.last_used_at.map_or("never".to_string(), |t| t.to_rfc3339()));
            println!("{} {}", "active:".dimmed(), key.is_active);
        }
        Action::UpdateLimit { id, requests_per_hour } => {
            db.api_keys().update_limit(id, requests_per_hour).await?;
            println!("{} {id} -> {requests_per_hour}/hr", "Updated:".green());
        }
        Action::Deactivate { id } => {
            db.api_keys().set_active(id, false).await?;
            println!("{} {id}", "Deactivated:".yellow());
        }
        Action::Reactivate { id } => {
            db.api_keys().set_active(id, true).await?;
            println!("{} {id}", "Reactivated:".green());
        }
        Action::Delete { id } => {
            db.api_keys().delete(id).await?;
            println!("{} {id}", "Deleted:".red());
        }
    }

    Ok(())
}
