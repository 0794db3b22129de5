//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sundry_core::{CartLineId, ProductId, UserId};

/// One line of a user's cart.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartLine {
    /// Unique line ID.
    pub id: CartLineId,
    /// Owning user.
    pub user_id: UserId,
    /// Carted product.
    pub product_id: ProductId,
    /// Units carted, always positive.
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A cart line joined with the current product name and price, for display
/// and for the checkout engine's working set.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PricedCartLine {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub name: String,
    /// Current unit price; carts are priced at read time, not at add time.
    pub price: i64,
    pub amount: i64,
}

impl PricedCartLine {
    /// The monetary value of this line at current prices.
    #[must_use]
    pub const fn line_total(&self) -> i64 {
        self.price * self.amount
    }
}

/// A user's cart with its running total.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub lines: Vec<PricedCartLine>,
    /// Sum of line totals at current prices.
    pub total: i64,
}
