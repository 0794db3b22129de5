//! Cart and checkout engine.
//!
//! The one place where money, stock and cart state change together. Every
//! mutating path runs inside a single database transaction, and balance and
//! stock are only ever changed through guarded updates
//! (`UPDATE .. WHERE balance >= total` / `.. WHERE stock >= amount`), so the
//! `balance >= 0` and `stock >= 0` invariants hold under any interleaving -
//! a failed guard rolls back the whole attempt, debit included.
//!
//! Prices are read at checkout time: a cart added yesterday is charged at
//! today's price, and a stale cart that outgrew the balance is rejected
//! here, not at add-to-cart time.

mod error;

pub use error::CheckoutError;

use chrono::Utc;
use sqlx::SqlitePool;

use sundry_core::{CartLineId, ProductId, UserId};

use crate::db::cart::CartRepository;
use crate::db::transactions::TransactionRepository;
use crate::models::cart::{CartLine, CartView, PricedCartLine};
use crate::models::transaction::TransactionRecord;

/// A cart line joined with the product state the engine needs, read inside
/// the checkout transaction.
#[derive(sqlx::FromRow)]
struct CheckoutLine {
    id: CartLineId,
    product_id: ProductId,
    name: String,
    price: i64,
    stock: i64,
    amount: i64,
}

/// Cart and checkout engine.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // Cart maintenance
    // =========================================================================

    /// Put `quantity` units of a product in the user's cart.
    ///
    /// If a line for this (user, product) pair already exists its amount is
    /// **replaced** by `quantity`, not incremented. Funds are not checked
    /// here.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::InvalidQuantity` unless `quantity > 0`,
    /// `NotFound` if the product doesn't exist.
    pub async fn add_to_cart(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<CartLine, CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM products WHERE id = ?")
            .bind(product_id)
            .fetch_optional(self.pool)
            .await?;
        if exists.is_none() {
            return Err(CheckoutError::NotFound {
                kind: "product",
                id: product_id.as_i64(),
            });
        }

        let line = CartRepository::new(self.pool)
            .upsert_line(user_id, product_id, quantity)
            .await?;

        Ok(line)
    }

    /// Remove a cart line.
    ///
    /// Idempotent in effect: a second call on the same id mutates nothing
    /// and reports not-found. Lines belonging to other users are
    /// indistinguishable from missing ones.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::NotFound` when no owned line was deleted.
    pub async fn remove_from_cart(
        &self,
        user_id: UserId,
        line_id: CartLineId,
    ) -> Result<(), CheckoutError> {
        let deleted = CartRepository::new(self.pool)
            .delete_line(user_id, line_id)
            .await?;

        if !deleted {
            return Err(CheckoutError::NotFound {
                kind: "cart line",
                id: line_id.as_i64(),
            });
        }

        Ok(())
    }

    /// The user's cart priced at current product prices.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the read fails.
    pub async fn cart(&self, user_id: UserId) -> Result<CartView, CheckoutError> {
        let lines = CartRepository::new(self.pool).priced_lines(user_id).await?;
        let total = lines.iter().map(PricedCartLine::line_total).sum();

        Ok(CartView { lines, total })
    }

    /// The user's purchase history, newest first.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::Repository` if the read fails.
    pub async fn transactions(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TransactionRecord>, CheckoutError> {
        Ok(TransactionRepository::new(self.pool)
            .list_for_user(user_id)
            .await?)
    }

    // =========================================================================
    // Purchasing
    // =========================================================================

    /// Convert the user's whole cart into transaction records.
    ///
    /// One transaction end to end: the balance is debited for the full total
    /// up front, then each line decrements stock, deletes itself and appends
    /// a history record. Any failed guard rolls everything back, debit
    /// included - there is no partial checkout.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::EmptyCart` if there are no lines
    /// - `CheckoutError::InsufficientFunds` with the shortfall if the
    ///   balance doesn't cover the total
    /// - `CheckoutError::InsufficientStock` naming the first product that
    ///   ran short
    pub async fn checkout(&self, user_id: UserId) -> Result<Vec<TransactionRecord>, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let lines: Vec<CheckoutLine> = sqlx::query_as(
            "SELECT cl.id, cl.product_id, p.name, p.price, p.stock, cl.amount \
             FROM cart_lines cl \
             JOIN products p ON p.id = cl.product_id \
             WHERE cl.user_id = ? \
             ORDER BY cl.id",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let total = lines
            .iter()
            .try_fold(0_i64, |acc, line| {
                line.amount
                    .checked_mul(line.price)
                    .and_then(|value| acc.checked_add(value))
            })
            .ok_or(CheckoutError::InvalidQuantity)?;

        debit_balance(&mut tx, user_id, total).await?;

        let mut receipts = Vec::with_capacity(lines.len());
        for line in &lines {
            let hit = sqlx::query(
                "UPDATE products SET stock = stock - ?, updated_at = ? \
                 WHERE id = ? AND stock >= ?",
            )
            .bind(line.amount)
            .bind(now)
            .bind(line.product_id)
            .bind(line.amount)
            .execute(&mut *tx)
            .await?;

            if hit.rows_affected() == 0 {
                // Dropping the transaction rolls back the debit and any
                // lines already processed.
                return Err(CheckoutError::InsufficientStock {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    available: line.stock,
                });
            }

            sqlx::query("DELETE FROM cart_lines WHERE id = ?")
                .bind(line.id)
                .execute(&mut *tx)
                .await?;

            let record = sqlx::query_as::<_, TransactionRecord>(
                "INSERT INTO transaction_history (user_id, product_id, amount, total, created_at) \
                 VALUES (?, ?, ?, ?, ?) \
                 RETURNING id, user_id, product_id, amount, total, created_at",
            )
            .bind(user_id)
            .bind(line.product_id)
            .bind(line.amount)
            .bind(line.price * line.amount)
            .bind(now)
            .fetch_one(&mut *tx)
            .await?;

            receipts.push(record);
        }

        tx.commit().await?;

        tracing::info!(user_id = %user_id, total, lines = receipts.len(), "checkout committed");
        Ok(receipts)
    }

    /// Buy a single product directly, bypassing the cart.
    ///
    /// Funds are checked before stock, matching the checkout error
    /// precedence; debit, decrement and the history append commit as one
    /// unit.
    ///
    /// # Errors
    ///
    /// - `CheckoutError::InvalidQuantity` unless `quantity > 0`
    /// - `CheckoutError::NotFound` if the product doesn't exist
    /// - `CheckoutError::InsufficientFunds` / `InsufficientStock` as for
    ///   [`checkout`](Self::checkout)
    pub async fn buy_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<TransactionRecord, CheckoutError> {
        if quantity <= 0 {
            return Err(CheckoutError::InvalidQuantity);
        }

        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let product: Option<(String, i64, i64)> = sqlx::query_as(
            "SELECT name, price, stock FROM products WHERE id = ?",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let (name, price, stock) = product.ok_or(CheckoutError::NotFound {
            kind: "product",
            id: product_id.as_i64(),
        })?;

        let total = quantity
            .checked_mul(price)
            .ok_or(CheckoutError::InvalidQuantity)?;

        debit_balance(&mut tx, user_id, total).await?;

        let hit = sqlx::query(
            "UPDATE products SET stock = stock - ?, updated_at = ? \
             WHERE id = ? AND stock >= ?",
        )
        .bind(quantity)
        .bind(now)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if hit.rows_affected() == 0 {
            return Err(CheckoutError::InsufficientStock {
                product_id,
                name,
                available: stock,
            });
        }

        let record = sqlx::query_as::<_, TransactionRecord>(
            "INSERT INTO transaction_history (user_id, product_id, amount, total, created_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, user_id, product_id, amount, total, created_at",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .bind(total)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(user_id = %user_id, product_id = %product_id, quantity, total, "direct purchase committed");
        Ok(record)
    }
}

/// Debit the full order total from the user's balance with a guarded
/// update. On a miss, re-reads the balance inside the transaction to report
/// the exact shortfall.
async fn debit_balance(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    user_id: UserId,
    total: i64,
) -> Result<(), CheckoutError> {
    let debited = sqlx::query(
        "UPDATE users SET balance = balance - ?, updated_at = ? \
         WHERE id = ? AND balance >= ?",
    )
    .bind(total)
    .bind(Utc::now())
    .bind(user_id)
    .bind(total)
    .execute(&mut **tx)
    .await?;

    if debited.rows_affected() == 0 {
        let balance: i64 = sqlx::query_scalar("SELECT balance FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or(CheckoutError::NotFound {
                kind: "user",
                id: user_id.as_i64(),
            })?;

        return Err(CheckoutError::InsufficientFunds {
            shortfall: total - balance,
        });
    }

    Ok(())
}
