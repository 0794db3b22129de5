//! Catalog and admin service.
//!
//! Product CRUD plus the admin-only user management operations (role and
//! balance changes). Public reads (listing, search, detail) also live here.

mod error;

pub use error::CatalogError;

use sqlx::SqlitePool;

use sundry_core::{ProductId, Role, UserId};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::models::product::{NewProduct, Product, ProductChanges};
use crate::models::user::User;

/// Catalog and admin service.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    users: UserRepository<'a>,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            users: UserRepository::new(pool),
        }
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateName` if the name is taken,
    /// `EmptyName`/`InvalidPrice`/`InvalidStock` on field validation.
    pub async fn create_product(&self, new: &NewProduct) -> Result<Product, CatalogError> {
        validate_product_fields(&new.name, new.price, new.stock)?;

        let product = self.products.create(new).await?;

        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist,
    /// `DuplicateName` if the new name clashes.
    pub async fn update_product(
        &self,
        id: ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, CatalogError> {
        validate_product_fields(&changes.name, changes.price, changes.stock)?;

        self.products.update(id, changes).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound {
                kind: "product",
                id: id.as_i64(),
            },
            other => other.into(),
        })
    }

    /// Record an uploaded image filename.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn set_image(&self, id: ProductId, filename: &str) -> Result<(), CatalogError> {
        self.products.set_image(id, filename).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound {
                kind: "product",
                id: id.as_i64(),
            },
            other => other.into(),
        })
    }

    /// Delete a product and everything referencing it.
    ///
    /// Cart lines and transaction-history rows go in the same database
    /// transaction. Returns the deleted product so the HTTP layer can remove
    /// its image file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn delete_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self.products.delete_cascade(id).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound {
                kind: "product",
                id: id.as_i64(),
            },
            other => other.into(),
        })?;

        tracing::info!(product_id = %id, name = %product.name, "product deleted");
        Ok(product)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product doesn't exist.
    pub async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.products
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound {
                kind: "product",
                id: id.as_i64(),
            })
    }

    /// List the whole catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.list().await?)
    }

    /// Case-insensitive substring search on product name.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn search_products(&self, needle: &str) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.search_by_name(needle).await?)
    }

    // =========================================================================
    // Admin: user management
    // =========================================================================

    /// Set a user's role.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the user doesn't exist.
    pub async fn set_role(&self, user_id: UserId, role: Role) -> Result<User, CatalogError> {
        let user = self.users.set_role(user_id, role).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound {
                kind: "user",
                id: user_id.as_i64(),
            },
            other => other.into(),
        })?;

        tracing::info!(user_id = %user_id, role = %role, "role changed");
        Ok(user)
    }

    /// Overwrite a user's balance.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidBalance` for negative amounts,
    /// `NotFound` if the user doesn't exist.
    pub async fn set_balance(&self, user_id: UserId, balance: i64) -> Result<User, CatalogError> {
        if balance < 0 {
            return Err(CatalogError::InvalidBalance);
        }

        let user = self.users.set_balance(user_id, balance).await.map_err(|e| match e {
            RepositoryError::NotFound => CatalogError::NotFound {
                kind: "user",
                id: user_id.as_i64(),
            },
            other => other.into(),
        })?;

        tracing::info!(user_id = %user_id, balance, "balance adjusted");
        Ok(user)
    }

    /// List all users for the admin dashboard.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn list_users(&self) -> Result<Vec<User>, CatalogError> {
        Ok(self.users.list().await?)
    }
}

/// Shared field validation for create and update.
fn validate_product_fields(name: &str, price: i64, stock: i64) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::EmptyName);
    }
    if price < 0 {
        return Err(CatalogError::InvalidPrice);
    }
    if stock < 0 {
        return Err(CatalogError::InvalidStock);
    }
    Ok(())
}
