//! Product repository
//!
//! Handles product CRUD with:
//! - Atomic creation of product + branch links + serial (transaction)
//! - Filtered, id-ordered listing with optional preloads
//! - Update-or-insert `save`

use catalog_core::{Entity, Paginated, Pagination, Product, Serial};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, QueryBuilder, Row, Sqlite, SqlitePool, Transaction};

use super::{fetch_live, soft_delete};
use crate::error::{DbError, DbResult};
use crate::preload;
use crate::query::{ProductQuery, PRODUCT_COLUMNS};

/// Product repository
pub struct ProductRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert one product with its branch links and serial.
    ///
    /// On success `product` carries its new id, timestamps and `serial`.
    pub async fn create(&self, product: &mut Product) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        insert(&mut tx, product).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert several products in one transaction.
    ///
    /// Either every product is written or none is. Ids are only filled in
    /// on success.
    pub async fn create_batch(&self, products: &mut [Product]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;
        let mut written = Vec::with_capacity(products.len());
        for product in products.iter() {
            let mut copy = product.clone();
            insert(&mut tx, &mut copy).await?;
            written.push(copy);
        }
        tx.commit().await?;

        for (product, saved) in products.iter_mut().zip(written) {
            *product = saved;
        }
        tracing::info!(count = products.len(), "created product batch");
        Ok(())
    }

    /// Live product by id, or `DbError::NotFound`.
    pub async fn get(&self, id: i64) -> DbResult<Product> {
        fetch_live(self.pool, id).await
    }

    /// First matching product by id order, with the query's preloads.
    pub async fn first(&self, query: &ProductQuery) -> DbResult<Option<Product>> {
        Ok(self.list(&query.clone().limit(1)).await?.into_iter().next())
    }

    /// Matching products ordered by id, with the query's preloads.
    pub async fn list(&self, query: &ProductQuery) -> DbResult<Vec<Product>> {
        let mut qb = query.select();
        let mut products: Vec<Product> = qb.build_query_as().fetch_all(self.pool).await?;
        tracing::debug!(rows = products.len(), sql = qb.sql(), "listed products");

        preload::load(self.pool, &mut products, query.preload()).await?;
        Ok(products)
    }

    /// Number of rows `query` matches, ignoring limit/offset.
    pub async fn count(&self, query: &ProductQuery) -> DbResult<i64> {
        let (total,): (i64,) = query.count().build_query_as().fetch_one(self.pool).await?;
        Ok(total)
    }

    /// One page of matching products plus the total match count.
    ///
    /// Any limit/offset already on `query` is replaced by the page window.
    pub async fn page(&self, query: &ProductQuery, page: Pagination) -> DbResult<Paginated<Product>> {
        let windowed = query
            .clone()
            .limit(page.limit())
            .offset(page.offset());

        let rows: Vec<SqliteRow> = windowed
            .select_with(&format!("{}, COUNT(*) OVER() AS total", PRODUCT_COLUMNS))
            .build()
            .fetch_all(self.pool)
            .await?;

        // Past the last page there is no row to carry the window total
        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None => self.count(query).await?,
        };
        let mut items = rows
            .iter()
            .map(Product::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        preload::load(self.pool, &mut items, query.preload()).await?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Update-or-insert keyed by id.
    ///
    /// A persisted product has its name, price and category written back;
    /// an unsaved one (id 0) is created as by [`ProductRepo::create`].
    pub async fn save(&self, product: &mut Product) -> DbResult<()> {
        if !product.is_persisted() {
            return self.create(product).await;
        }

        product.validate()?;
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, category_id = ?, updated_at = ?
            WHERE id = ? AND deleted_at IS NULL
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(product.category_id)
        .bind(now)
        .bind(product.meta.id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(Product::RESOURCE, product.meta.id));
        }

        product.meta.updated_at = now;
        tracing::debug!(id = product.meta.id, name = %product.name, "saved product");
        Ok(())
    }

    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        soft_delete::<Product>(self.pool, id).await
    }
}

/// Write product, branch links and serial inside `tx`.
async fn insert(tx: &mut Transaction<'_, Sqlite>, product: &mut Product) -> DbResult<()> {
    product.validate()?;
    if product.category_id == 0 {
        return Err(DbError::MissingCategory {
            product: product.name.clone(),
        });
    }
    if let Some(branch) = product.branches.iter().find(|b| !b.is_persisted()) {
        return Err(DbError::Unsaved {
            resource: "branch",
            name: branch.name.clone(),
        });
    }

    let now = Utc::now();
    let (id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products (created_at, updated_at, name, price, category_id)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(&product.name)
    .bind(product.price)
    .bind(product.category_id)
    .fetch_one(&mut **tx)
    .await?;

    product.meta.id = id;
    product.meta.created_at = now;
    product.meta.updated_at = now;

    if !product.branches.is_empty() {
        let mut builder =
            QueryBuilder::<Sqlite>::new("INSERT INTO product_branches (product_id, branch_id) ");
        builder.push_values(product.branches.iter(), |mut b, branch| {
            b.push_bind(id).push_bind(branch.meta.id);
        });
        builder.push(" ON CONFLICT DO NOTHING");
        builder.build().execute(&mut **tx).await?;
    }

    let mut serial = Serial::for_product(product);
    serial.validate()?;
    let (serial_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO serials (created_at, updated_at, number, product_id)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(&serial.number)
    .bind(id)
    .fetch_one(&mut **tx)
    .await?;

    serial.meta.id = serial_id;
    serial.meta.created_at = now;
    serial.meta.updated_at = now;
    product.serial = Some(serial);

    tracing::debug!(id, name = %product.name, "created product");
    Ok(())
}
