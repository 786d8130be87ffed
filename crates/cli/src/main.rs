//! Nepal Clothing CLI - database migrations and catalog management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront migrations (schema + session table)
//! nc-cli migrate
//!
//! # Load categories and products from YAML
//! nc-cli seed catalog --file crates/cli/data/catalog.yaml
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nc-cli")]
#[command(author, version, about = "Nepal Clothing CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert categories and products from a YAML file
    Catalog {
        /// Path to the catalog YAML file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file } => {
                commands::seed::catalog(&file).await?;
            }
        },
    }
    Ok(())
}
