//! `catalog seed`: write the reference branches, categories and products

use std::io::{self, Write};

use anyhow::Result;
use catalog_core::CatalogConfig;

use super::open_store;
use crate::seed::seed;

pub async fn run_seed(config: &CatalogConfig) -> Result<()> {
    let store = open_store(config).await?;

    let mut out = io::stdout().lock();
    seed(&store, &mut out).await?;
    out.flush()?;

    store.close().await;
    Ok(())
}
