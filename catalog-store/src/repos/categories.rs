//! Category repository

use std::collections::HashMap;

use catalog_core::{Category, Product};
use chrono::Utc;
use sqlx::SqlitePool;

use super::{fetch_all_live, fetch_live, soft_delete, ProductRepo};
use crate::error::DbResult;
use crate::query::{Condition, ProductQuery};

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a category, filling in its id and timestamps.
    pub async fn create(&self, category: &mut Category) -> DbResult<()> {
        category.validate()?;

        let now = Utc::now();
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO categories (created_at, updated_at, name) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(now)
        .bind(now)
        .bind(&category.name)
        .fetch_one(self.pool)
        .await?;

        category.meta.id = id;
        category.meta.created_at = now;
        category.meta.updated_at = now;
        tracing::debug!(id, name = %category.name, "created category");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> DbResult<Category> {
        fetch_live(self.pool, id).await
    }

    /// First live category with exactly this name, lowest id first.
    pub async fn first_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as(
            r#"
            SELECT * FROM categories
            WHERE name = ? AND deleted_at IS NULL
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await?;
        Ok(category)
    }

    pub async fn list(&self) -> DbResult<Vec<Category>> {
        fetch_all_live(self.pool).await
    }

    /// Categories with their products loaded through `products`.
    ///
    /// The product query's own filters and preloads apply, so
    /// `ProductQuery::new().with_serial()` resolves
    /// category -> products -> serial in three queries.
    /// Any limit/offset on `products` applies across all categories.
    pub async fn list_with_products(&self, products: ProductQuery) -> DbResult<Vec<Category>> {
        let mut categories = self.list().await?;
        if categories.is_empty() {
            return Ok(categories);
        }

        let ids = categories.iter().map(|c| c.meta.id).collect();
        let loaded = ProductRepo::new(self.pool)
            .list(&products.filter(Condition::CategoryIn(ids)))
            .await?;

        let mut by_category: HashMap<i64, Vec<Product>> = HashMap::new();
        for product in loaded {
            by_category.entry(product.category_id).or_default().push(product);
        }
        for category in &mut categories {
            category.products = by_category.remove(&category.meta.id).unwrap_or_default();
        }
        Ok(categories)
    }

    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        soft_delete::<Category>(self.pool, id).await
    }
}
