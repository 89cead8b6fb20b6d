//! # Pansen Schema Tool
//!
//! Validates configuration and manages the `parent`/`child` schema of the
//! configured database.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use pansen_sqla::config::AppConfig;
use pansen_sqla::database::{DatabaseConnection, DatabaseMigrations};
use pansen_sqla::logging::{init_structured_logging, LogConfig};

#[derive(Parser)]
#[command(name = "pansen-schema")]
#[command(about = "Validate configuration and manage the pansen database schema")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Dotenv file merged under the process environment
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Run against the `_test` database
    #[arg(long)]
    test_mode: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration with secrets masked
    Check,

    /// Apply outstanding migrations
    Migrate,

    /// Drop and recreate both tables (test mode only)
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_with_dotenv(&cli.env_file)
        .with_context(|| format!("loading configuration (dotenv: {})", cli.env_file.display()))?;
    if cli.test_mode {
        config = config.into_test_mode();
    }

    init_structured_logging(&LogConfig::from_app_config(&config));

    match cli.command {
        Commands::Check => {
            println!("{}", serde_json::to_string_pretty(&config.debug_config())?);
        }
        Commands::Migrate => {
            let db = DatabaseConnection::connect(&config).await?;
            DatabaseMigrations::run_all(db.pool()).await?;
            db.close().await;
        }
        Commands::Reset => {
            if !config.test_mode {
                bail!("refusing to reset the schema outside test mode (pass --test-mode or set TEST_MODE=true)");
            }
            let db = DatabaseConnection::connect(&config).await?;
            DatabaseMigrations::reset_schema(db.pool()).await?;
            info!(
                ready = DatabaseMigrations::schema_ready(db.pool()).await?,
                "Schema reset"
            );
            db.close().await;
        }
    }

    Ok(())
}
