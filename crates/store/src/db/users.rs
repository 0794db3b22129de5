//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use sundry_core::{Email, Role, UserId, Username};

use super::{RepositoryError, map_unique_violation};
use crate::models::user::User;

/// Columns selected for [`User`] rows; keeps `password_hash` out of the
/// domain type.
const USER_COLUMNS: &str = "id, username, email, role, balance, created_at, updated_at";

/// A user row joined with its password hash, for the auth paths only.
#[derive(sqlx::FromRow)]
struct UserWithHash {
    id: UserId,
    username: Username,
    email: Email,
    role: Role,
    balance: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    password_hash: String,
}

impl UserWithHash {
    fn split(self) -> (User, String) {
        (
            User {
                id: self.id,
                username: self.username,
                email: self.email,
                role: self.role,
                balance: self.balance,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            self.password_hash,
        )
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with a pre-hashed password.
    ///
    /// Role and balance come from the schema defaults (`user`, the signup
    /// grant).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict("username")` or `Conflict("email")`
    /// if the unique constraint is hit, `RepositoryError::Database` otherwise.
    pub async fn create(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?) \
             RETURNING id, username, email, role, balance, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(self.pool)
        .await
        .map_err(map_unique_violation)
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by their login name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user and their password hash by login name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(
            "SELECT id, username, email, role, balance, created_at, updated_at, password_hash \
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserWithHash::split))
    }

    /// Get a user and their password hash by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_hash_by_id(
        &self,
        id: UserId,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHash>(
            "SELECT id, username, email, role, balance, created_at, updated_at, password_hash \
             FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(UserWithHash::split))
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::Database` otherwise.
    pub async fn update_password(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?",
        )
        .bind(password_hash)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Rename a user and/or change their email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` with the offending column on a
    /// uniqueness clash, `RepositoryError::NotFound` if the user doesn't
    /// exist.
    pub async fn update_profile(
        &self,
        id: UserId,
        username: &Username,
        email: &Email,
    ) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET username = ?, email = ?, updated_at = ? WHERE id = ? \
             RETURNING id, username, email, role, balance, created_at, updated_at",
        )
        .bind(username)
        .bind(email)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(map_unique_violation)?
        .ok_or(RepositoryError::NotFound)
    }

    /// Set a user's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_role(&self, id: UserId, role: Role) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET role = ?, updated_at = ? WHERE id = ? \
             RETURNING id, username, email, role, balance, created_at, updated_at",
        )
        .bind(role)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Overwrite a user's balance.
    ///
    /// The caller validates non-negativity; the schema CHECK is the backstop.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn set_balance(&self, id: UserId, balance: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET balance = ?, updated_at = ? WHERE id = ? \
             RETURNING id, username, email, role, balance, created_at, updated_at",
        )
        .bind(balance)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }
}
