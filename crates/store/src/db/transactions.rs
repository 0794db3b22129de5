//! Transaction history repository.
//!
//! Read-only from the repository's point of view: rows are appended inside
//! the checkout engine's transactions and removed only by the product-delete
//! cascade.

use sqlx::SqlitePool;

use sundry_core::UserId;

use super::RepositoryError;
use crate::models::transaction::TransactionRecord;

/// Repository for transaction history reads.
pub struct TransactionRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TransactionRepository<'a> {
    /// Create a new transaction repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// A user's purchase history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TransactionRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            "SELECT id, user_id, product_id, amount, total, created_at \
             FROM transaction_history WHERE user_id = ? ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}
