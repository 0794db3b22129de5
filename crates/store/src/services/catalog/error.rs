//! Catalog service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during catalog and admin operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A product with this name already exists.
    #[error("a product with this name already exists")]
    DuplicateName,

    /// The referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "product" or "user".
        kind: &'static str,
        /// The missing ID (or -1 when looked up by name).
        id: i64,
    },

    /// Product name is empty or whitespace.
    #[error("product name cannot be empty")]
    EmptyName,

    /// Price below zero.
    #[error("price cannot be negative")]
    InvalidPrice,

    /// Stock below zero.
    #[error("stock cannot be negative")]
    InvalidStock,

    /// Balance below zero.
    #[error("balance cannot be negative")]
    InvalidBalance,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for CatalogError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Conflict(_) => Self::DuplicateName,
            other => Self::Repository(other),
        }
    }
}
