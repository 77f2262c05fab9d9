//! Guided tour of the store: seed, look up, filter, update, preload
//!
//! Every step writes its result to `out`; a point lookup that finds nothing
//! prints `nao encontrado` and the tour carries on.

use std::io::Write;

use anyhow::{Context, Result};
use catalog_core::Product;
use catalog_store::{DbResult, Preload, ProductQuery, Store};
use tracing::info;

use crate::seed::seed;

const SEPARATOR: &str = "======";
const NOT_FOUND: &str = "nao encontrado";

/// Run every step against a freshly migrated store.
pub async fn run(store: &Store, out: &mut impl Write) -> Result<()> {
    seed(store, out).await.context("seeding catalog")?;

    lookups(store, out).await?;
    windows(store, out).await?;
    predicates(store, out).await?;
    rename(store, out).await?;
    by_category(store, out).await?;
    serials(store, out).await?;
    nested(store, out).await?;
    by_branch(store, out).await?;

    info!("walkthrough complete");
    Ok(())
}

fn print_found(out: &mut impl Write, found: DbResult<Option<Product>>) -> Result<()> {
    match found? {
        Some(product) => writeln!(out, "{}", product)?,
        None => writeln!(out, "{}", NOT_FOUND)?,
    }
    Ok(())
}

fn print_ids(out: &mut impl Write, products: &[Product]) -> Result<()> {
    for p in products {
        writeln!(out, "ID: {}, Nome: {}", p.meta.id, p.name)?;
    }
    Ok(())
}

fn print_prices(out: &mut impl Write, products: &[Product]) -> Result<()> {
    for p in products {
        writeln!(out, "ID: {}, Nome: {}, Preco: {:.2}", p.meta.id, p.name, p.price)?;
    }
    Ok(())
}

async fn lookups(store: &Store, out: &mut impl Write) -> Result<()> {
    let by_id = match store.products().get(2).await {
        Ok(product) => Ok(Some(product)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    };
    print_found(out, by_id).context("looking up product 2")?;

    let by_name = store
        .products()
        .first(&ProductQuery::new().name_eq("Monitor"))
        .await;
    print_found(out, by_name).context("looking up Monitor")
}

async fn windows(store: &Store, out: &mut impl Write) -> Result<()> {
    let repo = store.products();

    let all = repo.list(&ProductQuery::new()).await.context("listing products")?;
    print_ids(out, &all)?;

    let first = repo
        .list(&ProductQuery::new().limit(2))
        .await
        .context("listing first page")?;
    print_ids(out, &first)?;

    writeln!(out, "{}", SEPARATOR)?;
    let second = repo
        .list(&ProductQuery::new().limit(2).offset(2))
        .await
        .context("listing second page")?;
    print_ids(out, &second)
}

async fn predicates(store: &Store, out: &mut impl Write) -> Result<()> {
    let repo = store.products();

    writeln!(out, "{}", SEPARATOR)?;
    let expensive = repo
        .list(&ProductQuery::new().price_gt(500.0))
        .await
        .context("filtering by price")?;
    print_prices(out, &expensive)?;

    writeln!(out, "{}", SEPARATOR)?;
    let matching = repo
        .list(&ProductQuery::new().name_like("%Mo%"))
        .await
        .context("filtering by name")?;
    print_prices(out, &matching)
}

async fn rename(store: &Store, out: &mut impl Write) -> Result<()> {
    let repo = store.products();

    if let Some(mut mouse) = repo
        .first(&ProductQuery::new().name_eq("Mouse"))
        .await
        .context("looking up Mouse")?
    {
        mouse.name = "Mouse Razer".to_string();
        repo.save(&mut mouse).await.context("renaming Mouse")?;
    }

    writeln!(out, "{}", SEPARATOR)?;
    match repo
        .first(&ProductQuery::new().name_like("%Mouse%"))
        .await
        .context("looking up renamed Mouse")?
    {
        Some(p) => writeln!(out, "Nome: {}, Preco: {:.2}", p.name, p.price)?,
        None => writeln!(out, "{}", NOT_FOUND)?,
    }
    Ok(())
}

async fn by_category(store: &Store, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    let Some(category) = store
        .categories()
        .first_by_name("Periféricos")
        .await
        .context("looking up Periféricos")?
    else {
        writeln!(out, "{}", NOT_FOUND)?;
        return Ok(());
    };

    writeln!(out, "{}", category.name)?;
    let products = store
        .products()
        .list(&ProductQuery::new().category_is(category.meta.id))
        .await
        .context("listing products by category")?;
    print_prices(out, &products)
}

async fn serials(store: &Store, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Todos os Produtos")?;
    let products = store
        .products()
        .list(&ProductQuery::new().with_category().with_serial())
        .await
        .context("listing products with category")?;
    for p in &products {
        let category = p.category.as_ref().map(|c| c.name.as_str()).unwrap_or_default();
        writeln!(out, "Produto: {}, Categoria: {}", p.name, category)?;
    }

    let missing: Vec<Product> = products.into_iter().filter(|p| p.serial.is_none()).collect();
    store
        .serials()
        .backfill_missing(&missing)
        .await
        .context("backfilling serials")?;

    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Todos os Produtos com Numero Serial")?;
    let products = store
        .products()
        .list(&ProductQuery::new().with_serial())
        .await
        .context("listing products with serial")?;
    for p in &products {
        let serial = p.serial.as_ref().map(|s| s.number.as_str()).unwrap_or_default();
        writeln!(out, "ID: {}, Nome: {}, Serial: {}", p.meta.id, p.name, serial)?;
    }
    Ok(())
}

async fn nested(store: &Store, out: &mut impl Write) -> Result<()> {
    let categories = store
        .categories()
        .list_with_products(ProductQuery::new())
        .await
        .context("listing categories with products")?;
    for c in &categories {
        writeln!(out, "{}", c.name)?;
        for p in &c.products {
            writeln!(out, "-> Produto: {}, Preco: {:.2}", p.name, p.price)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "{}", SEPARATOR)?;
    let categories = store
        .categories()
        .list_with_products(ProductQuery::new().with_serial())
        .await
        .context("listing categories with products and serials")?;
    for c in &categories {
        writeln!(out, "{}", c.name)?;
        for p in &c.products {
            let serial = p.serial.as_ref().map(|s| s.number.as_str()).unwrap_or_default();
            writeln!(
                out,
                "-> Produto: {}, Preco: {:.2}, Serial: {}",
                p.name, p.price, serial
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

async fn by_branch(store: &Store, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "Produtos por Filial")?;
    let branches = store
        .branches()
        .list_with_products(Preload::default())
        .await
        .context("listing branches with products")?;
    for b in &branches {
        writeln!(out, "{}", b.name)?;
        for p in &b.products {
            writeln!(out, "-> Produto: {}, Preco: {:.2}", p.name, p.price)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn transcript() -> String {
        let store = Store::connect("sqlite::memory:", 1).await.unwrap();
        store.ensure_schema().await.unwrap();

        let mut out = Vec::new();
        run(&store, &mut out).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    /// Lines between the n-th separator and the next one
    fn section(text: &str, n: usize) -> Vec<&str> {
        text.split("======\n")
            .nth(n)
            .unwrap_or_default()
            .lines()
            .collect()
    }

    #[tokio::test]
    async fn lookups_and_windows() {
        let text = transcript().await;
        let head = section(&text, 0);

        assert_eq!(
            &head[3..8],
            [
                "ID: 1, Nome: Mouse",
                "ID: 2, Nome: Monitor",
                "ID: 3, Nome: Placa mãe",
                "ID: 2, Nome: Monitor, Preco: 890.00, CategoriaID: 2",
                "ID: 2, Nome: Monitor, Preco: 890.00, CategoriaID: 2",
            ]
        );
        // all five, then the first page of two
        assert_eq!(head.len(), 8 + 5 + 2);
        assert_eq!(head[head.len() - 2..], ["ID: 1, Nome: Mouse", "ID: 2, Nome: Monitor"]);

        assert_eq!(
            section(&text, 1),
            ["ID: 3, Nome: Placa mãe", "ID: 4, Nome: Notebook"]
        );
    }

    #[tokio::test]
    async fn filters_and_rename() {
        let text = transcript().await;

        assert_eq!(
            section(&text, 2),
            [
                "ID: 2, Nome: Monitor, Preco: 890.00",
                "ID: 3, Nome: Placa mãe, Preco: 1280.00",
                "ID: 4, Nome: Notebook, Preco: 2560.30",
            ]
        );
        assert_eq!(
            section(&text, 3),
            [
                "ID: 1, Nome: Mouse, Preco: 160.00",
                "ID: 2, Nome: Monitor, Preco: 890.00",
            ]
        );
        assert_eq!(section(&text, 4), ["Nome: Mouse Razer, Preco: 160.00"]);
        assert_eq!(
            section(&text, 5),
            [
                "Periféricos",
                "ID: 1, Nome: Mouse Razer, Preco: 160.00",
                "ID: 2, Nome: Monitor, Preco: 890.00",
                "ID: 3, Nome: Placa mãe, Preco: 1280.00",
                "ID: 5, Nome: Teclado, Preco: 240.00",
            ]
        );
    }

    #[tokio::test]
    async fn serials_follow_product_and_category() {
        let text = transcript().await;

        assert_eq!(section(&text, 6)[0], "Todos os Produtos");
        assert_eq!(section(&text, 6)[4], "Produto: Notebook, Categoria: Portátil");

        let with_serial = section(&text, 7);
        assert_eq!(
            with_serial[1..6],
            [
                "ID: 1, Nome: Mouse Razer, Serial: 12",
                "ID: 2, Nome: Monitor, Serial: 22",
                "ID: 3, Nome: Placa mãe, Serial: 32",
                "ID: 4, Nome: Notebook, Serial: 41",
                "ID: 5, Nome: Teclado, Serial: 52",
            ]
        );
        assert_eq!(with_serial[6], "Portátil");
        assert_eq!(with_serial[7], "-> Produto: Notebook, Preco: 2560.30");

        let nested = section(&text, 8);
        assert_eq!(nested[0], "Portátil");
        assert_eq!(nested[1], "-> Produto: Notebook, Preco: 2560.30, Serial: 41");
        assert!(nested.contains(&"-> Produto: Teclado, Preco: 240.00, Serial: 52"));
    }

    #[tokio::test]
    async fn branches_list_their_products() {
        let text = transcript().await;

        assert_eq!(
            section(&text, 9),
            [
                "Produtos por Filial",
                "Matriz",
                "-> Produto: Mouse Razer, Preco: 160.00",
                "-> Produto: Monitor, Preco: 890.00",
                "-> Produto: Notebook, Preco: 2560.30",
                "-> Produto: Teclado, Preco: 240.00",
                "",
                "Filial",
                "-> Produto: Mouse Razer, Preco: 160.00",
                "-> Produto: Placa mãe, Preco: 1280.00",
                "-> Produto: Notebook, Preco: 2560.30",
                "",
            ]
        );
    }
}
