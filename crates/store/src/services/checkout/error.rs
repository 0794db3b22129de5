//! Checkout engine error types.

use thiserror::Error;

use sundry_core::ProductId;

use crate::db::RepositoryError;

/// Errors that can occur in the cart and checkout engine.
///
/// All of these are recoverable, user-facing conditions; the request that
/// produced them rolls back completely and nothing is retried.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with no cart lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Balance doesn't cover the order total.
    #[error("insufficient funds: {shortfall} more needed")]
    InsufficientFunds {
        /// How much more balance the order needs.
        shortfall: i64,
    },

    /// A product has fewer units on hand than the order asks for.
    #[error("insufficient stock of {name}: only {available} left")]
    InsufficientStock {
        /// The product that ran short.
        product_id: ProductId,
        /// Its display name, for the client message.
        name: String,
        /// Units actually available.
        available: i64,
    },

    /// Quantity was zero, negative, or absurdly large.
    #[error("quantity must be a positive integer")]
    InvalidQuantity,

    /// The referenced entity does not exist.
    #[error("{kind} {id} not found")]
    NotFound {
        /// Entity kind, e.g. "product" or "cart line".
        kind: &'static str,
        /// The missing ID.
        id: i64,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}
