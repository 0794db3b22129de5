//! Cart line repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use sundry_core::{CartLineId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::{CartLine, PricedCartLine};

/// Repository for cart line database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a cart line, or replace the amount of the existing line for
    /// this (user, product) pair.
    ///
    /// Replacement (not accumulation) is deliberate: re-adding a product
    /// sets the quantity the user last asked for.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_line(
        &self,
        user_id: UserId,
        product_id: ProductId,
        amount: i64,
    ) -> Result<CartLine, RepositoryError> {
        let line = sqlx::query_as::<_, CartLine>(
            "INSERT INTO cart_lines (user_id, product_id, amount, created_at) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT (user_id, product_id) DO UPDATE SET amount = excluded.amount \
             RETURNING id, user_id, product_id, amount, created_at",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(amount)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        Ok(line)
    }

    /// Delete a cart line owned by the given user.
    ///
    /// # Returns
    ///
    /// `true` if a line was deleted, `false` if no such line existed (also
    /// the case when the line belongs to someone else).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_line(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_lines WHERE id = ? AND user_id = ?")
            .bind(line_id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// A user's cart lines joined with current product names and prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn priced_lines(&self, user_id: UserId) -> Result<Vec<PricedCartLine>, RepositoryError> {
        let lines = sqlx::query_as::<_, PricedCartLine>(
            "SELECT cl.id, cl.product_id, p.name, p.price, cl.amount \
             FROM cart_lines cl \
             JOIN products p ON p.id = cl.product_id \
             WHERE cl.user_id = ? \
             ORDER BY cl.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }
}
