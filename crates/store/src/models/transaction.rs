//! Transaction history domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sundry_core::{ProductId, TransactionId, UserId};

/// An immutable record of a completed purchase.
///
/// Append-only: nothing in the application updates these rows after insert.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TransactionRecord {
    /// Unique record ID.
    pub id: TransactionId,
    /// Purchasing user.
    pub user_id: UserId,
    /// Purchased product.
    pub product_id: ProductId,
    /// Units purchased.
    pub amount: i64,
    /// Price paid: unit price at purchase time times `amount`.
    pub total: i64,
    pub created_at: DateTime<Utc>,
}
