//! SQLite persistence for the product catalog
//!
//! [`Store`] owns the connection pool and hands out one repository per
//! entity. Every repository hides soft-deleted rows unless asked otherwise,
//! and product listings are always ordered by id.
//!
//! ```no_run
//! # async fn run() -> catalog_store::DbResult<()> {
//! use catalog_store::{ProductQuery, Store};
//!
//! let store = Store::connect("sqlite::memory:", 1).await?;
//! store.ensure_schema().await?;
//!
//! let expensive = store
//!     .products()
//!     .list(&ProductQuery::new().price_gt(500.0).with_category())
//!     .await?;
//! # let _ = expensive;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod pool;
pub mod preload;
pub mod query;
pub mod repos;
pub mod schema;

pub use error::{DbError, DbResult};
pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use query::{Condition, Preload, ProductQuery};
pub use repos::{BranchRepo, CategoryRepo, ProductRepo, SerialRepo};
pub use schema::{ensure_schema, EntityDef, SchemaError, CATALOG_SCHEMA};

use sqlx::SqlitePool;

/// Handle to the catalog database
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if needed) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let pool = create_pool_with_options(url, max_connections).await?;
        Ok(Self { pool })
    }

    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Create the catalog tables and indexes if missing.
    pub async fn ensure_schema(&self) -> DbResult<()> {
        ensure_schema(&self.pool, CATALOG_SCHEMA).await?;
        Ok(())
    }

    pub fn products(&self) -> ProductRepo<'_> {
        ProductRepo::new(&self.pool)
    }

    pub fn categories(&self) -> CategoryRepo<'_> {
        CategoryRepo::new(&self.pool)
    }

    pub fn branches(&self) -> BranchRepo<'_> {
        BranchRepo::new(&self.pool)
    }

    pub fn serials(&self) -> SerialRepo<'_> {
        SerialRepo::new(&self.pool)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
