use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

mod commands;
mod styles;

use commands::ingest::Domain;
use commands::keys::Action as KeyAction;

#[derive(Parser)]
#[command(name = "camparl")]
#[command(about = "Operator CLI for the Canadian federal parliamentary data platform")]
#[command(version)]
#[command(styles = styles::get_styles())]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run embedded migrations to head (idempotent)
    Migrate,

    /// Start the read API and syndication feed server
    Serve,

    /// Start the scheduler: cron-fires deployments, polls and executes runs
    Worker {
        /// Work-pool tag this worker claims runs for
        #[arg(long, default_value = "default")]
        pool_tag: String,

        /// Max tasks executed concurrently within one flow run
        #[arg(long, default_value = "10")]
        task_concurrency: usize,

        #[arg(long, default_value = "ca-federal")]
        jurisdiction: String,
    },

    /// Run one ingestion domain immediately, outside the scheduler
    Ingest {
        #[arg(value_enum)]
        domain: Domain,

        #[arg(long, default_value = "ca-federal")]
        jurisdiction: String,

        #[arg(long, default_value = "44")]
        parliament: i16,

        #[arg(long, default_value = "1")]
        session: i16,
    },

    /// Bootstrap a fresh database with one development API key
    Seed,

    /// Manage API keys
    Keys {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Serve => commands::serve::run().await,
        Commands::Worker { pool_tag, task_concurrency, jurisdiction } => {
            commands::worker::run(pool_tag, task_concurrency, jurisdiction).await
        }
        Commands::Ingest { domain, jurisdiction, parliament, session } => {
            commands::ingest::run(domain, jurisdiction, parliament, session).await
        }
        Commands::Seed => commands::seed::run().await,
        Commands::Keys { action } => commands::keys::run(action).await,
    }
}
