//! Command implementations for the catalog CLI

pub mod migrate;
pub mod products;
pub mod seed;
pub mod walkthrough;

pub use migrate::run_migrate;
pub use products::run_products;
pub use seed::run_seed;
pub use walkthrough::run_walkthrough;

use anyhow::{Context, Result};
use catalog_core::CatalogConfig;
use catalog_store::Store;

use crate::ui;

/// Connect to the configured database and make sure the schema exists.
pub(crate) async fn open_store(config: &CatalogConfig) -> Result<Store> {
    let url = &config.database.url;
    let store = Store::connect(url, config.database.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", url))?;

    ui::with_spinner_async("Preparing schema", "Schema ready", store.ensure_schema())
        .await
        .context("Failed to prepare schema")?;
    Ok(store)
}
