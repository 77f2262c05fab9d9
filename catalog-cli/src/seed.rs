//! Reference data for the walkthrough

use std::io::Write;

use anyhow::{Context, Result};
use catalog_core::{Branch, Category, Product};
use catalog_store::Store;
use tracing::info;

/// Everything the seeder wrote, with ids filled in
#[derive(Debug, Clone)]
pub struct SeedReport {
    pub branches: Vec<Branch>,
    pub categories: Vec<Category>,
    /// The three-product batch
    pub batch: Vec<Product>,
    /// Notebook, inserted on its own
    pub single: Product,
    /// Teclado, a batch of one
    pub single_batch: Vec<Product>,
}

impl SeedReport {
    /// All seeded products in insertion order.
    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.batch
            .iter()
            .chain(std::iter::once(&self.single))
            .chain(self.single_batch.iter())
    }
}

/// Write branches, categories and products, printing progress to `out`.
pub async fn seed(store: &Store, out: &mut impl Write) -> Result<SeedReport> {
    writeln!(out, "Criando Filiais")?;
    let mut matriz = Branch::new("Matriz");
    let mut filial = Branch::new("Filial");
    for branch in [&mut matriz, &mut filial] {
        store
            .branches()
            .create(branch)
            .await
            .with_context(|| format!("creating branch {}", branch.name))?;
    }

    writeln!(out, "Criando Categorias")?;
    let mut portatil = Category::new("Portátil");
    let mut perifericos = Category::new("Periféricos");
    for category in [&mut portatil, &mut perifericos] {
        store
            .categories()
            .create(category)
            .await
            .with_context(|| format!("creating category {}", category.name))?;
    }

    writeln!(out, "Criando Produtos")?;
    let mut batch = vec![
        Product::new("Mouse", 160.00, &perifericos).at_branches([&matriz, &filial]),
        Product::new("Monitor", 890.00, &perifericos).at_branches([&matriz]),
        Product::new("Placa mãe", 1280.00, &perifericos).at_branches([&filial]),
    ];
    store
        .products()
        .create_batch(&mut batch)
        .await
        .context("creating product batch")?;

    let mut single = Product::new("Notebook", 2560.30, &portatil).at_branches([&matriz, &filial]);
    store
        .products()
        .create(&mut single)
        .await
        .context("creating Notebook")?;

    let mut single_batch =
        vec![Product::new("Teclado", 240.00, &perifericos).at_branches([&matriz])];
    store
        .products()
        .create_batch(&mut single_batch)
        .await
        .context("creating Teclado")?;

    for product in &batch {
        writeln!(out, "ID: {}, Nome: {}", product.meta.id, product.name)?;
    }

    let report = SeedReport {
        branches: vec![matriz, filial],
        categories: vec![portatil, perifericos],
        batch,
        single,
        single_batch,
    };
    info!(products = report.products().count(), "seeded catalog");
    Ok(report)
}
