//! Product query builder
//!
//! Composes filters, an explicit `ORDER BY id` window and the relations to
//! preload. Soft-deleted rows are excluded unless `with_deleted` is set.
//!
//! ```
//! use catalog_store::ProductQuery;
//!
//! let query = ProductQuery::new()
//!     .name_like("%Mo%")
//!     .price_gt(500.0)
//!     .limit(2)
//!     .with_category();
//! assert!(query.preload().category);
//! ```

use sqlx::{QueryBuilder, Sqlite};

pub(crate) const PRODUCT_COLUMNS: &str =
    "p.id, p.created_at, p.updated_at, p.deleted_at, p.name, p.price, p.category_id";

/// Filter on product rows
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Exact name match
    NameEq(String),
    /// SQL LIKE pattern on the name (`%` and `_` wildcards)
    NameLike(String),
    /// Price strictly greater than the value
    PriceGt(f64),
    /// Belongs to the category
    CategoryIs(i64),
    /// Belongs to any of the categories
    CategoryIn(Vec<i64>),
}

impl Condition {
    fn push(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        match self {
            Self::NameEq(name) => {
                qb.push("p.name = ").push_bind(name.clone());
            }
            Self::NameLike(pattern) => {
                qb.push("p.name LIKE ").push_bind(pattern.clone());
            }
            Self::PriceGt(price) => {
                qb.push("p.price > ").push_bind(*price);
            }
            Self::CategoryIs(id) => {
                qb.push("p.category_id = ").push_bind(*id);
            }
            Self::CategoryIn(ids) if ids.is_empty() => {
                qb.push("1 = 0");
            }
            Self::CategoryIn(ids) => {
                qb.push("p.category_id IN (");
                let mut list = qb.separated(", ");
                for id in ids {
                    list.push_bind(*id);
                }
                list.push_unseparated(")");
            }
        }
    }
}

/// Relations to load alongside products, one batched query each
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preload {
    pub category: bool,
    pub serial: bool,
    pub branches: bool,
}

impl Preload {
    pub fn any(&self) -> bool {
        self.category || self.serial || self.branches
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    conditions: Vec<Condition>,
    limit: Option<u32>,
    offset: Option<u64>,
    preload: Preload,
    with_deleted: bool,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn name_eq(self, name: impl Into<String>) -> Self {
        self.filter(Condition::NameEq(name.into()))
    }

    pub fn name_like(self, pattern: impl Into<String>) -> Self {
        self.filter(Condition::NameLike(pattern.into()))
    }

    pub fn price_gt(self, price: f64) -> Self {
        self.filter(Condition::PriceGt(price))
    }

    pub fn category_is(self, category_id: i64) -> Self {
        self.filter(Condition::CategoryIs(category_id))
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_category(mut self) -> Self {
        self.preload.category = true;
        self
    }

    pub fn with_serial(mut self) -> Self {
        self.preload.serial = true;
        self
    }

    pub fn with_branches(mut self) -> Self {
        self.preload.branches = true;
        self
    }

    pub fn with_preload(mut self, preload: Preload) -> Self {
        self.preload = preload;
        self
    }

    /// Include soft-deleted rows
    pub fn with_deleted(mut self) -> Self {
        self.with_deleted = true;
        self
    }

    pub fn preload(&self) -> Preload {
        self.preload
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// `SELECT ... FROM products p WHERE ... ORDER BY p.id ASC [LIMIT] [OFFSET]`
    pub(crate) fn select(&self) -> QueryBuilder<'static, Sqlite> {
        self.select_with(PRODUCT_COLUMNS)
    }

    /// Same as `select`, with extra columns appended to the projection.
    pub(crate) fn select_with(&self, columns: &str) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM products p", columns));
        self.push_where(&mut qb);
        self.push_window(&mut qb);
        qb
    }

    /// `SELECT COUNT(*) FROM products p WHERE ...`, ignoring the window.
    pub(crate) fn count(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM products p");
        self.push_where(&mut qb);
        qb
    }

    fn push_where(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        qb.push(" WHERE 1=1");
        if !self.with_deleted {
            qb.push(" AND p.deleted_at IS NULL");
        }
        for condition in &self.conditions {
            qb.push(" AND ");
            condition.push(qb);
        }
    }

    fn push_window(&self, qb: &mut QueryBuilder<'static, Sqlite>) {
        qb.push(" ORDER BY p.id ASC");

        match (self.limit, self.offset) {
            (Some(limit), _) => {
                qb.push(" LIMIT ").push_bind(i64::from(limit));
            }
            // SQLite only accepts OFFSET after a LIMIT
            (None, Some(_)) => {
                qb.push(" LIMIT -1");
            }
            (None, None) => {}
        }

        if let Some(offset) = self.offset {
            qb.push(" OFFSET ")
                .push_bind(i64::try_from(offset).unwrap_or(i64::MAX));
        }
    }
}
