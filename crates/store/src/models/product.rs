//! Product domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sundry_core::{Category, ProductId};

/// Filename recorded for products without an uploaded image.
pub const NO_IMAGE: &str = "default.png";

/// A catalog entry.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name, unique across the catalog.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Price in whole currency units, non-negative.
    pub price: i64,
    /// Units on hand, non-negative.
    pub stock: i64,
    /// Department.
    pub category: Category,
    /// Image filename under the image directory; [`NO_IMAGE`] when none
    /// was uploaded.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether this product has an uploaded image (vs the sentinel).
    #[must_use]
    pub fn has_image(&self) -> bool {
        self.image != NO_IMAGE
    }
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i64,
    pub category: Category,
}

/// Full-replace edit of a product, mirroring the admin edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i64,
    pub category: Category,
}
