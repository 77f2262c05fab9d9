//! Eager loading of product relations
//!
//! Each relation costs one `IN (...)` query for the whole slice of products,
//! never one query per product.

use std::collections::{BTreeSet, HashMap};

use catalog_core::{Branch, Category, Product, Serial};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use crate::query::Preload;

/// Branch row joined through `product_branches`
#[derive(FromRow)]
struct BranchLink {
    product_id: i64,
    #[sqlx(flatten)]
    branch: Branch,
}

/// Fill the requested relations on `products`.
pub async fn load(pool: &SqlitePool, products: &mut [Product], preload: Preload) -> DbResult<()> {
    if products.is_empty() || !preload.any() {
        return Ok(());
    }

    if preload.category {
        load_categories(pool, products).await?;
    }
    if preload.serial {
        load_serials(pool, products).await?;
    }
    if preload.branches {
        load_branches(pool, products).await?;
    }
    Ok(())
}

/// `SELECT <columns> FROM <from> WHERE <alias>.deleted_at IS NULL AND <key> IN (ids...)`
fn select_in(
    columns: &str,
    from: &str,
    alias: &str,
    key: &str,
    ids: &BTreeSet<i64>,
) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM {} WHERE {}.deleted_at IS NULL AND {} IN (",
        columns, from, alias, key
    ));
    let mut list = qb.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
    list.push_unseparated(")");
    qb
}

async fn load_categories(pool: &SqlitePool, products: &mut [Product]) -> DbResult<()> {
    let ids: BTreeSet<i64> = products.iter().map(|p| p.category_id).collect();

    let categories: Vec<Category> = select_in("c.*", "categories c", "c", "c.id", &ids)
        .build_query_as()
        .fetch_all(pool)
        .await?;
    debug!(requested = ids.len(), found = categories.len(), "preloaded categories");

    let by_id: HashMap<i64, Category> = categories.into_iter().map(|c| (c.meta.id, c)).collect();
    for product in products.iter_mut() {
        product.category = by_id.get(&product.category_id).cloned();
    }
    Ok(())
}

async fn load_serials(pool: &SqlitePool, products: &mut [Product]) -> DbResult<()> {
    let ids: BTreeSet<i64> = products.iter().map(|p| p.meta.id).collect();

    let serials: Vec<Serial> = select_in("s.*", "serials s", "s", "s.product_id", &ids)
        .build_query_as()
        .fetch_all(pool)
        .await?;
    debug!(requested = ids.len(), found = serials.len(), "preloaded serials");

    let by_product: HashMap<i64, Serial> =
        serials.into_iter().map(|s| (s.product_id, s)).collect();
    for product in products.iter_mut() {
        product.serial = by_product.get(&product.meta.id).cloned();
    }
    Ok(())
}

async fn load_branches(pool: &SqlitePool, products: &mut [Product]) -> DbResult<()> {
    let ids: BTreeSet<i64> = products.iter().map(|p| p.meta.id).collect();

    let mut qb = select_in(
        "pb.product_id, b.*",
        "product_branches pb JOIN branches b ON b.id = pb.branch_id",
        "b",
        "pb.product_id",
        &ids,
    );
    qb.push(" ORDER BY b.id ASC");
    let links: Vec<BranchLink> = qb.build_query_as().fetch_all(pool).await?;
    debug!(requested = ids.len(), links = links.len(), "preloaded branches");

    let mut by_product: HashMap<i64, Vec<Branch>> = HashMap::new();
    for link in links {
        by_product.entry(link.product_id).or_default().push(link.branch);
    }
    for product in products.iter_mut() {
        product.branches = by_product.get(&product.meta.id).cloned().unwrap_or_default();
    }
    Ok(())
}
