//! Schema creation for catalog tables
//!
//! `ensure_schema` creates whatever is missing and then checks that every
//! table carries the columns the repositories read. Existing tables are
//! never altered; a table missing a column is reported, not repaired.

use sqlx::{Sqlite, SqlitePool, Transaction};
use thiserror::Error;
use tracing::{debug, info};

/// Schema failure
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to create {table}: {source}")]
    Statement {
        table: &'static str,
        source: sqlx::Error,
    },

    #[error("table {table} exists but has no column {column}")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

/// DDL for one table plus the columns the store depends on
#[derive(Debug, Clone, Copy)]
pub struct EntityDef {
    pub table: &'static str,
    pub create: &'static str,
    pub indexes: &'static [&'static str],
    pub columns: &'static [&'static str],
}

/// Catalog tables in foreign-key order
pub const CATALOG_SCHEMA: &[EntityDef] = &[
    EntityDef {
        table: "categories",
        create: r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                deleted_at DATETIME,
                name TEXT NOT NULL
            )
        "#,
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_categories_deleted_at ON categories(deleted_at)",
        ],
        columns: &["id", "created_at", "updated_at", "deleted_at", "name"],
    },
    EntityDef {
        table: "branches",
        create: r#"
            CREATE TABLE IF NOT EXISTS branches (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                deleted_at DATETIME,
                name TEXT NOT NULL
            )
        "#,
        indexes: &["CREATE INDEX IF NOT EXISTS idx_branches_deleted_at ON branches(deleted_at)"],
        columns: &["id", "created_at", "updated_at", "deleted_at", "name"],
    },
    EntityDef {
        table: "products",
        create: r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                deleted_at DATETIME,
                name TEXT NOT NULL,
                price REAL NOT NULL,
                category_id INTEGER NOT NULL REFERENCES categories(id)
            )
        "#,
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category_id)",
            "CREATE INDEX IF NOT EXISTS idx_products_deleted_at ON products(deleted_at)",
        ],
        columns: &[
            "id",
            "created_at",
            "updated_at",
            "deleted_at",
            "name",
            "price",
            "category_id",
        ],
    },
    EntityDef {
        table: "product_branches",
        create: r#"
            CREATE TABLE IF NOT EXISTS product_branches (
                product_id INTEGER NOT NULL REFERENCES products(id),
                branch_id INTEGER NOT NULL REFERENCES branches(id),
                PRIMARY KEY (product_id, branch_id)
            )
        "#,
        indexes: &[
            "CREATE INDEX IF NOT EXISTS idx_product_branches_branch ON product_branches(branch_id)",
        ],
        columns: &["product_id", "branch_id"],
    },
    EntityDef {
        table: "serials",
        create: r#"
            CREATE TABLE IF NOT EXISTS serials (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at DATETIME NOT NULL,
                updated_at DATETIME NOT NULL,
                deleted_at DATETIME,
                number TEXT NOT NULL,
                product_id INTEGER NOT NULL REFERENCES products(id)
            )
        "#,
        indexes: &[
            // One live serial per product
            "CREATE UNIQUE INDEX IF NOT EXISTS ux_serials_product ON serials(product_id) WHERE deleted_at IS NULL",
            "CREATE INDEX IF NOT EXISTS idx_serials_deleted_at ON serials(deleted_at)",
        ],
        columns: &[
            "id",
            "created_at",
            "updated_at",
            "deleted_at",
            "number",
            "product_id",
        ],
    },
];

/// Create missing tables, verify their columns, then create indexes.
///
/// All statements run in one transaction; running twice is a no-op.
pub async fn ensure_schema(pool: &SqlitePool, defs: &[EntityDef]) -> Result<(), SchemaError> {
    info!(tables = defs.len(), "ensuring schema");

    let mut tx = pool.begin().await.map_err(|source| SchemaError::Statement {
        table: "schema",
        source,
    })?;

    for def in defs {
        execute(&mut tx, def.table, def.create).await?;
        check_columns(&mut tx, def).await?;
        for sql in def.indexes {
            execute(&mut tx, def.table, sql).await?;
        }
        debug!(table = def.table, "table ready");
    }

    tx.commit().await.map_err(|source| SchemaError::Statement {
        table: "schema",
        source,
    })?;

    info!("schema ready");
    Ok(())
}

async fn execute(
    tx: &mut Transaction<'_, Sqlite>,
    table: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    sqlx::query(sql)
        .execute(&mut **tx)
        .await
        .map_err(|source| SchemaError::Statement { table, source })?;
    Ok(())
}

async fn check_columns(
    tx: &mut Transaction<'_, Sqlite>,
    def: &EntityDef,
) -> Result<(), SchemaError> {
    let existing: Vec<(String,)> = sqlx::query_as("SELECT name FROM pragma_table_info(?)")
        .bind(def.table)
        .fetch_all(&mut **tx)
        .await
        .map_err(|source| SchemaError::Statement {
            table: def.table,
            source,
        })?;

    match def
        .columns
        .iter()
        .copied()
        .find(|column| !existing.iter().any(|(name,)| name.as_str() == *column))
    {
        Some(column) => Err(SchemaError::MissingColumn {
            table: def.table,
            column,
        }),
        None => Ok(()),
    }
}
