//! Repository implementations for catalog entities
//!
//! Each repository follows these patterns:
//! - Every default read filters `deleted_at IS NULL`
//! - Inserts populate id and timestamps on the caller's value (`RETURNING`)
//! - Multi-row writes run in one transaction
//! - Relations are preloaded in batches (no N+1)

pub mod branches;
pub mod categories;
pub mod products;
pub mod serials;

pub use branches::BranchRepo;
pub use categories::CategoryRepo;
pub use products::ProductRepo;
pub use serials::SerialRepo;

use catalog_core::Entity;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::error::{DbError, DbResult};

/// Live row of `T` by id, or `DbError::NotFound`.
pub(crate) async fn fetch_live<T>(pool: &SqlitePool, id: i64) -> DbResult<T>
where
    T: Entity + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE id = ? AND deleted_at IS NULL",
        T::TABLE
    );
    sqlx::query_as::<_, T>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::not_found(T::RESOURCE, id))
}

/// All live rows of `T`, ordered by id.
pub(crate) async fn fetch_all_live<T>(pool: &SqlitePool) -> DbResult<Vec<T>>
where
    T: Entity + for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    let sql = format!(
        "SELECT * FROM {} WHERE deleted_at IS NULL ORDER BY id ASC",
        T::TABLE
    );
    Ok(sqlx::query_as::<_, T>(&sql).fetch_all(pool).await?)
}

/// Mark a live row of `T` deleted. Already-deleted and missing rows are NotFound.
pub(crate) async fn soft_delete<T: Entity>(pool: &SqlitePool, id: i64) -> DbResult<()> {
    let now = Utc::now();
    let sql = format!(
        "UPDATE {} SET deleted_at = ?, updated_at = ? WHERE id = ? AND deleted_at IS NULL",
        T::TABLE
    );
    let result = sqlx::query(&sql)
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found(T::RESOURCE, id));
    }

    tracing::debug!(table = T::TABLE, id, "soft deleted");
    Ok(())
}
