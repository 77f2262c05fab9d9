//! catalog CLI - product catalog on SQLite
//!
//! Entry point for the `catalog` binary, which provides:
//! - Schema creation (`migrate`)
//! - Reference data (`seed`)
//! - A guided tour of lookups, filters, updates and preloads (`walkthrough`, the default)
//! - Filtered, paginated listing (`products`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use catalog_core::CatalogConfig;
use clap::{Parser, Subcommand};
use tracing::debug;

mod commands;
mod seed;
mod tracing_setup;
mod ui;
mod walkthrough;

use tracing_setup::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(
    name = "catalog",
    author,
    version,
    about = "Product catalog with branches, categories and serial numbers on SQLite",
    long_about = "Seed and query a small product catalog. Without a subcommand, runs the \
                  walkthrough: seed, look up, filter, rename and preload relations."
)]
struct Cli {
    /// Database URL (e.g. sqlite:catalog.db, sqlite::memory:)
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Config file (default: ~/.catalog/config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create missing tables and indexes
    Migrate,
    /// Insert the reference branches, categories and products
    Seed,
    /// Seed, then run every lookup, filter, update and preload (default)
    Walkthrough,
    /// List products with filters, preloads and pagination
    Products(commands::products::ProductsArgs),
}

fn load_config(cli: &Cli) -> Result<CatalogConfig> {
    let config = CatalogConfig::load(cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_database_url(cli.database_url.clone());
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads DATABASE_URL
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&TracingConfig { debug: cli.debug }).ok();
    ui::init_quiet_mode(cli.quiet);

    let config = load_config(&cli)?;
    debug!(url = %config.database.url, "resolved database");

    match cli.command.unwrap_or(Commands::Walkthrough) {
        Commands::Migrate => commands::run_migrate(&config).await?,
        Commands::Seed => commands::run_seed(&config).await?,
        Commands::Walkthrough => commands::run_walkthrough(&config).await?,
        Commands::Products(args) => commands::run_products(&config, args).await?,
    }
    Ok(())
}
