pub mod config;
pub mod error;
pub mod model;
pub mod pagination;
pub mod validation;

pub use config::{CatalogConfig, DatabaseConfig};
pub use error::{CatalogError, Result};
pub use model::{Branch, Category, Entity, Product, RecordMeta, Serial, SoftDeletable};
pub use pagination::{Paginated, Pagination};
pub use validation::ValidationError;
