//! `catalog products`: filtered, paginated product listing

use std::io::{self, Write};

use anyhow::{Context, Result};
use catalog_core::pagination::DEFAULT_PER_PAGE;
use catalog_core::{CatalogConfig, Paginated, Pagination, Product};
use catalog_store::ProductQuery;
use clap::{Parser, ValueEnum};

use super::open_store;

#[derive(Parser, Debug)]
pub struct ProductsArgs {
    /// SQL LIKE pattern matched against the name (e.g. "%Mo%")
    #[arg(long)]
    pub name_like: Option<String>,

    /// Only products priced strictly above this
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Only products in this category id
    #[arg(long)]
    pub category: Option<i64>,

    /// Page number (1-indexed)
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Items per page (max 100)
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,

    /// Load each product's category
    #[arg(long)]
    pub with_category: bool,

    /// Load each product's serial number
    #[arg(long)]
    pub with_serial: bool,

    /// Load the branches stocking each product
    #[arg(long)]
    pub with_branches: bool,

    /// Include soft-deleted products
    #[arg(long)]
    pub include_deleted: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl ProductsArgs {
    fn query(&self) -> ProductQuery {
        let mut query = ProductQuery::new();
        if let Some(pattern) = &self.name_like {
            query = query.name_like(pattern.clone());
        }
        if let Some(price) = self.min_price {
            query = query.price_gt(price);
        }
        if let Some(category) = self.category {
            query = query.category_is(category);
        }
        if self.with_category {
            query = query.with_category();
        }
        if self.with_serial {
            query = query.with_serial();
        }
        if self.with_branches {
            query = query.with_branches();
        }
        if self.include_deleted {
            query = query.with_deleted();
        }
        query
    }
}

pub async fn run_products(config: &CatalogConfig, args: ProductsArgs) -> Result<()> {
    let store = open_store(config).await?;

    let page = store
        .products()
        .page(&args.query(), Pagination::new(args.page, args.per_page))
        .await
        .context("Failed to list products")?;

    let mut out = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &page).context("Failed to encode products")?;
            writeln!(out)?;
        }
        OutputFormat::Text => write_text(&mut out, &page)?,
    }
    out.flush()?;

    store.close().await;
    Ok(())
}

fn write_text(out: &mut impl Write, page: &Paginated<Product>) -> Result<()> {
    for p in &page.items {
        write!(out, "{}", p)?;
        if let Some(category) = &p.category {
            write!(out, ", Categoria: {}", category.name)?;
        }
        if let Some(serial) = &p.serial {
            write!(out, ", Serial: {}", serial.number)?;
        }
        if !p.branches.is_empty() {
            let names: Vec<&str> = p.branches.iter().map(|b| b.name.as_str()).collect();
            write!(out, ", Filiais: {}", names.join(", "))?;
        }
        if p.meta.deleted_at.is_some() {
            write!(out, " (removido)")?;
        }
        writeln!(out)?;
    }

    writeln!(
        out,
        "Pagina {}/{} ({} produtos)",
        page.page,
        page.total_pages(),
        page.total
    )?;
    Ok(())
}
