//! Account service error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Username fails shape validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] sundry_core::UsernameError),

    /// Email fails shape validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] sundry_core::EmailError),

    /// Password too short.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password and confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,

    /// Username already registered.
    #[error("username already taken")]
    UsernameTaken,

    /// Email already registered.
    #[error("email linked with another account")]
    EmailTaken,

    /// Wrong username or password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AccountError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::UserNotFound,
            RepositoryError::Conflict(column) if column == "email" => Self::EmailTaken,
            RepositoryError::Conflict(_) => Self::UsernameTaken,
            other => Self::Repository(other),
        }
    }
}
