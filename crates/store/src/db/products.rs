//! Product repository for database operations.

use chrono::Utc;
use sqlx::SqlitePool;

use sundry_core::ProductId;

use super::{RepositoryError, map_unique_violation};
use crate::models::product::{NewProduct, Product, ProductChanges};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, category, image, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new product; the image starts at the no-image sentinel.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("name")` if the name is taken.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        sqlx::query_as::<_, Product>(
            "INSERT INTO products (name, description, price, stock, category, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, name, description, price, stock, category, image, created_at, updated_at",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.stock)
        .bind(new.category)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("name")` if the new name clashes,
    /// `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(
            "UPDATE products SET name = ?, description = ?, price = ?, stock = ?, category = ?, \
             updated_at = ? WHERE id = ? \
             RETURNING id, name, description, price, stock, category, image, created_at, updated_at",
        )
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(changes.category)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Record the uploaded image filename for a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn set_image(&self, id: ProductId, image: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE products SET image = ?, updated_at = ? WHERE id = ?")
            .bind(image)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a product together with its cart lines and transaction
    /// history, in one transaction.
    ///
    /// Returns the deleted product so the caller can clean up its image
    /// file. Removing transaction history here mirrors the original system's
    /// cascade; see DESIGN.md for the caveat.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete_cascade(&self, id: ProductId) -> Result<Product, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cart_lines WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM transaction_history WHERE product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let product = sqlx::query_as::<_, Product>(
            "DELETE FROM products WHERE id = ? \
             RETURNING id, name, description, price, stock, category, image, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    /// List the whole catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive substring search on product name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_by_name(&self, needle: &str) -> Result<Vec<Product>, RepositoryError> {
        // Escape LIKE metacharacters so a literal % or _ in the query
        // matches itself.
        let escaped = needle.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE name LIKE '%' || ? || '%' ESCAPE '\\' ORDER BY id"
        ))
        .bind(escaped)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }
}
