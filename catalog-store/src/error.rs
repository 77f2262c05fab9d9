//! Error types for catalog-store

use catalog_core::ValidationError;
use thiserror::Error;

use crate::schema::SchemaError;

pub type DbResult<T> = Result<T, DbError>;

/// Database error type
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("invalid {0}")]
    Validation(#[from] ValidationError),

    #[error("product '{product}' has no category")]
    MissingCategory { product: String },

    #[error("{resource} '{name}' must be saved first")]
    Unsaved { resource: &'static str, name: String },
}

impl DbError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// True for the "no such live row" signal of point lookups.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("product", 42);
        assert_eq!(err.to_string(), "not found: product '42'");
        assert!(err.is_not_found());
    }

    #[test]
    fn validation_display() {
        let err: DbError = ValidationError::Empty {
            field: "branch name",
        }
        .into();
        assert_eq!(err.to_string(), "invalid branch name cannot be empty");
        assert!(!err.is_not_found());
    }

    #[test]
    fn unsaved_display() {
        let err = DbError::Unsaved {
            resource: "branch",
            name: "Matriz".into(),
        };
        assert_eq!(err.to_string(), "branch 'Matriz' must be saved first");
    }
}
