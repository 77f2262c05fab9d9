//! `catalog walkthrough`: seed, then exercise every query on the new rows

use std::io::{self, Write};

use anyhow::Result;
use catalog_core::CatalogConfig;

use super::open_store;
use crate::walkthrough;

pub async fn run_walkthrough(config: &CatalogConfig) -> Result<()> {
    let store = open_store(config).await?;

    let mut out = io::stdout().lock();
    walkthrough::run(&store, &mut out).await?;
    out.flush()?;

    store.close().await;
    Ok(())
}
