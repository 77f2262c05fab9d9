//! Catalog entities: products, categories, branches and serial numbers
//!
//! Each entity embeds a [`RecordMeta`] (id plus timestamps) and implements
//! [`Entity`]. Relation fields are never read from a row; they are filled by
//! the store's preload step and stay empty otherwise.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use crate::validation::{validate_name, validate_price, validate_serial_number, ValidationError};

/// Identifier plus lifecycle timestamps shared by every entity.
///
/// `id == 0` means the value has not been written yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct RecordMeta {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Rows that are marked deleted instead of being removed.
pub trait SoftDeletable {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// A persisted record kind backed by its own table.
pub trait Entity: SoftDeletable {
    /// Table holding rows of this kind
    const TABLE: &'static str;
    /// Label used in "not found" errors
    const RESOURCE: &'static str;

    fn meta(&self) -> &RecordMeta;

    fn id(&self) -> i64 {
        self.meta().id
    }

    fn is_persisted(&self) -> bool {
        self.id() != 0
    }
}

macro_rules! impl_entity {
    ($ty:ty, $table:literal, $resource:literal) => {
        impl SoftDeletable for $ty {
            fn deleted_at(&self) -> Option<DateTime<Utc>> {
                self.meta.deleted_at
            }
        }

        impl Entity for $ty {
            const TABLE: &'static str = $table;
            const RESOURCE: &'static str = $resource;

            fn meta(&self) -> &RecordMeta {
                &self.meta
            }
        }
    };
}

/// A sellable item, owned by one category and stocked at any number of branches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Product {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,
    pub price: f64,
    pub category_id: i64,

    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<Serial>,

    /// Branches to link on insert; the linked set when preloaded
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
}

impl Product {
    /// New, unsaved product pinned to `category`.
    pub fn new(name: impl Into<String>, price: f64, category: &Category) -> Self {
        Self {
            name: name.into(),
            price,
            category_id: category.meta.id,
            category: Some(category.clone()),
            ..Self::default()
        }
    }

    /// Attach the branches this product is available at.
    pub fn at_branches<'a>(mut self, branches: impl IntoIterator<Item = &'a Branch>) -> Self {
        self.branches = branches.into_iter().cloned().collect();
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("product name", &self.name)?;
        validate_price(self.price)
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Nome: {}, Preco: {:.2}, CategoriaID: {}",
            self.meta.id, self.name, self.price, self.category_id
        )
    }
}

/// Groups products; inverse side of `Product::category_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Category {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,

    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("category name", &self.name)
    }
}

/// A store location; many-to-many with products.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Branch {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: String,

    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<Product>,
}

impl Branch {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_name("branch name", &self.name)
    }
}

/// Serial number record; at most one live serial per product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, FromRow)]
pub struct Serial {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub number: String,
    pub product_id: i64,
}

impl Serial {
    /// Serial assigned to a product: its id followed by its category id.
    ///
    /// ```
    /// use catalog_core::Serial;
    ///
    /// assert_eq!(Serial::number_for(4, 1), "41");
    /// ```
    pub fn number_for(product_id: i64, category_id: i64) -> String {
        format!("{}{}", product_id, category_id)
    }

    /// Unsaved serial for a persisted product.
    pub fn for_product(product: &Product) -> Self {
        Self {
            number: Self::number_for(product.meta.id, product.category_id),
            product_id: product.meta.id,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_serial_number(&self.number)
    }
}

impl_entity!(Product, "products", "product");
impl_entity!(Category, "categories", "category");
impl_entity!(Branch, "branches", "branch");
impl_entity!(Serial, "serials", "serial");

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted_category(id: i64, name: &str) -> Category {
        let mut category = Category::new(name);
        category.meta.id = id;
        category
    }

    #[test]
    fn new_product_is_unsaved_and_pinned() {
        let perifericos = persisted_category(2, "Periféricos");
        let product = Product::new("Mouse", 160.0, &perifericos);

        assert!(!product.is_persisted());
        assert_eq!(product.category_id, 2);
        assert_eq!(product.category.as_ref().map(|c| c.name.as_str()), Some("Periféricos"));
        assert!(product.serial.is_none());
    }

    #[test]
    fn at_branches_keeps_order() {
        let category = persisted_category(1, "Portátil");
        let matriz = Branch::new("Matriz");
        let filial = Branch::new("Filial");

        let product = Product::new("Notebook", 2560.30, &category).at_branches([&matriz, &filial]);
        let names: Vec<_> = product.branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["Matriz", "Filial"]);
    }

    #[test]
    fn soft_delete_flag() {
        let mut branch = Branch::new("Matriz");
        assert!(!branch.is_deleted());

        branch.meta.deleted_at = Some(Utc::now());
        assert!(branch.is_deleted());
    }

    #[test]
    fn serial_for_product() {
        let category = persisted_category(2, "Periféricos");
        let mut product = Product::new("Monitor", 890.0, &category);
        product.meta.id = 3;

        let serial = Serial::for_product(&product);
        assert_eq!(serial.number, "32");
        assert_eq!(serial.product_id, 3);
        assert!(serial.validate().is_ok());
    }

    #[test]
    fn display_uses_two_decimals() {
        let category = persisted_category(1, "Portátil");
        let mut product = Product::new("Notebook", 2560.3, &category);
        product.meta.id = 4;

        assert_eq!(
            product.to_string(),
            "ID: 4, Nome: Notebook, Preco: 2560.30, CategoriaID: 1"
        );
    }

    #[test]
    fn product_validation() {
        let category = persisted_category(1, "Portátil");
        assert!(Product::new("Notebook", 10.0, &category).validate().is_ok());
        assert!(Product::new("", 10.0, &category).validate().is_err());
        assert!(Product::new("Notebook", -1.0, &category).validate().is_err());
    }

    #[test]
    fn table_names() {
        assert_eq!(Product::TABLE, "products");
        assert_eq!(Category::TABLE, "categories");
        assert_eq!(Branch::TABLE, "branches");
        assert_eq!(Serial::TABLE, "serials");
    }
}
