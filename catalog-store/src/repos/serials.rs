//! Serial repository
//!
//! Serials are normally written together with their product. This repo
//! covers lookups and repairing products that predate that rule.

use catalog_core::{Entity, Product, Serial};
use chrono::Utc;
use sqlx::SqlitePool;

use super::{fetch_live, soft_delete};
use crate::error::{DbError, DbResult};

/// Serial repository
pub struct SerialRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SerialRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> DbResult<Serial> {
        fetch_live(self.pool, id).await
    }

    /// Live serial of a product, if it has one.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Option<Serial>> {
        let serial = sqlx::query_as(
            "SELECT * FROM serials WHERE product_id = ? AND deleted_at IS NULL",
        )
        .bind(product_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(serial)
    }

    /// Return the product's live serial, writing one if it has none.
    ///
    /// Safe to repeat: an existing serial is returned unchanged.
    pub async fn ensure_for(&self, product: &Product) -> DbResult<Serial> {
        if !product.is_persisted() {
            return Err(DbError::Unsaved {
                resource: Product::RESOURCE,
                name: product.name.clone(),
            });
        }
        let serial = Serial::for_product(product);
        serial.validate()?;

        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO serials (created_at, updated_at, number, product_id)
            VALUES (?, ?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(&serial.number)
        .bind(serial.product_id)
        .execute(self.pool)
        .await?;

        self.for_product(product.meta.id)
            .await?
            .ok_or_else(|| DbError::not_found(Serial::RESOURCE, product.meta.id))
    }

    /// Give every listed product without a live serial its serial.
    ///
    /// Returns how many serials were written.
    pub async fn backfill_missing(&self, products: &[Product]) -> DbResult<usize> {
        let mut written = 0;
        for product in products {
            if self.for_product(product.meta.id).await?.is_none() {
                self.ensure_for(product).await?;
                written += 1;
            }
        }
        if written > 0 {
            tracing::info!(written, "backfilled serials");
        }
        Ok(written)
    }

    pub async fn soft_delete(&self, id: i64) -> DbResult<()> {
        soft_delete::<Serial>(self.pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use catalog_core::Product;

    use crate::repos::testing::{memory_store, reference_data};
    use crate::ProductQuery;

    #[tokio::test]
    async fn serial_written_with_product() {
        let store = memory_store().await;
        let (portatil, _, _, _) = reference_data(&store).await;

        let mut notebook = Product::new("Notebook", 2560.30, &portatil);
        store.products().create(&mut notebook).await.unwrap();

        let serial = store
            .serials()
            .for_product(notebook.meta.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(serial.number, "11");
        assert_eq!(Some(serial.meta.id), notebook.serial.as_ref().map(|s| s.meta.id));
        assert_eq!(store.serials().get(serial.meta.id).await.unwrap().number, "11");
    }

    #[tokio::test]
    async fn ensure_for_does_not_duplicate() {
        let store = memory_store().await;
        let (portatil, _, _, _) = reference_data(&store).await;

        let mut notebook = Product::new("Notebook", 2560.30, &portatil);
        store.products().create(&mut notebook).await.unwrap();

        let again = store.serials().ensure_for(&notebook).await.unwrap();
        assert_eq!(Some(again.meta.id), notebook.serial.as_ref().map(|s| s.meta.id));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM serials")
            .fetch_one(store.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn backfill_repairs_products_without_serial() {
        let store = memory_store().await;
        let (_, perifericos, _, _) = reference_data(&store).await;

        // Written without going through the repository
        let now = chrono::Utc::now();
        sqlx::query(
            "INSERT INTO products (created_at, updated_at, name, price, category_id) \
             VALUES (?, ?, 'Legado', 10.0, ?)",
        )
        .bind(now)
        .bind(now)
        .bind(perifericos.meta.id)
        .execute(store.pool())
        .await
        .unwrap();

        let products = store.products().list(&ProductQuery::new()).await.unwrap();
        assert!(store
            .serials()
            .for_product(products[0].meta.id)
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.serials().backfill_missing(&products).await.unwrap(), 1);
        assert_eq!(store.serials().backfill_missing(&products).await.unwrap(), 0);

        let loaded = store
            .products()
            .list(&ProductQuery::new().with_serial())
            .await
            .unwrap();
        assert_eq!(loaded[0].serial.as_ref().unwrap().number, "12");
    }

    #[tokio::test]
    async fn deleted_serial_can_be_replaced() {
        let store = memory_store().await;
        let (portatil, _, _, _) = reference_data(&store).await;

        let mut notebook = Product::new("Notebook", 2560.30, &portatil);
        store.products().create(&mut notebook).await.unwrap();
        let old = notebook.serial.clone().unwrap();

        store.serials().soft_delete(old.meta.id).await.unwrap();
        assert!(store
            .serials()
            .for_product(notebook.meta.id)
            .await
            .unwrap()
            .is_none());

        let replacement = store.serials().ensure_for(&notebook).await.unwrap();
        assert_ne!(replacement.meta.id, old.meta.id);
        assert_eq!(replacement.number, old.number);
    }
}
