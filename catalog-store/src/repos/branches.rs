//! Branch repository

use std::collections::{BTreeSet, HashMap};

use catalog_core::{Branch, Product};
use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, SqlitePool};

use super::{fetch_all_live, fetch_live, soft_delete};
use crate::error::DbResult;
use crate::preload;
use crate::query::{Preload, PRODUCT_COLUMNS};

/// Product row joined through `product_branches`
#[derive(FromRow)]
struct ProductLink {
    branch_id: i64,
    #[sqlx(flatten)]
    product: Product,
}

/// Branch repository
pub struct BranchRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> BranchRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a branch, filling in its id and timestamps.
    pub async fn create(&self, branch: &mut Branch) -> DbResult<()> {
        branch.validate()?;

        let now = Utc::now();
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO branches (created_at, updated_at, name) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(now)
        .bind(now)
        .bind(&branch.name)
        .fetch_one(self.pool)
        .await?;

        branch.meta.id = id;
        branch.meta.created_at = now;
        branch.meta.updated_at = now;
        tracing::debug!(id, name = %branch.name, "created branch");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> DbResult<Branch> {
        fetch_live(self.pool, id).await
    }

    pub async fn list(&self) -> DbResult<Vec<Branch>> {
        fetch_all_live(self.pool).await
    }

    /// Branches with the live products stocked at each.
    ///
    /// A product linked to two branches appears under both.
    pub async fn list_with_products(&self, relations: Preload) -> DbResult<Vec<Branch>> {
        let mut branches = self.list().await?;
        if branches.is_empty() {
            return Ok(branches);
        }

        let ids: BTreeSet<i64> = branches.iter().map(|b| b.meta.id).collect();
        let mut qb = QueryBuilder::new(format!(
            "SELECT pb.branch_id, {} FROM product_branches pb \
             JOIN products p ON p.id = pb.product_id \
             WHERE p.deleted_at IS NULL AND pb.branch_id IN (",
            PRODUCT_COLUMNS
        ));
        let mut list = qb.separated(", ");
        for id in &ids {
            list.push_bind(*id);
        }
        list.push_unseparated(") ORDER BY p.id ASC");

        let links: Vec<ProductLink> = qb.build_query_as().fetch_all(self.pool).await?;
        let (branch_ids, mut products): (Vec<i64>, Vec<Product>) =
            links.into_iter().map(|l| (l.branch_id, l.product)).unzip();
        preload::load(self.pool, &mut products, relations).await?;

        let mut by_branch: HashMap<i64, Vec<Product>> = HashMap::new();
        for (branch_id, product) in branch_ids.into_iter().zip(products) {
            by_branch.entry(branch_id).or_default().push(product);
        }
        for branch in &mut branches {
            branch.products = by_branch.remove(&branch.meta.id).unwrap_or_default();
        }
        Ok(branches)
    }

    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        soft_delete::<Branch>(self.pool, id).await
    }
}
