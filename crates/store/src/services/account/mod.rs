//! Account service.
//!
//! Registration, login, password change and profile edits. Passwords are
//! hashed with Argon2id; verification failures and unknown usernames both
//! collapse into [`AccountError::InvalidCredentials`].

mod error;

pub use error::AccountError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::SqlitePool;

use sundry_core::{Email, UserId, Username};

use crate::db::users::UserRepository;
use crate::models::user::User;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Account service.
pub struct AccountService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// New accounts start with the default role and balance; registration
    /// does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidUsername`/`InvalidEmail` on shape
    /// failures, `WeakPassword`/`PasswordMismatch` on password problems,
    /// and `UsernameTaken`/`EmailTaken` on uniqueness clashes.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<User, AccountError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        if password != password_confirm {
            return Err(AccountError::PasswordMismatch);
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self.users.create(&username, &email, &password_hash).await?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` if the username/password
    /// pair is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AccountError> {
        let username =
            Username::parse(username).map_err(|_| AccountError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_hash(&username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Change a user's password, verifying the old one first.
    ///
    /// The HTTP layer ends the session after a successful change.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` if the old password is
    /// wrong, `WeakPassword`/`PasswordMismatch` on new-password problems.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_password: &str,
        new_password: &str,
        new_password_confirm: &str,
    ) -> Result<(), AccountError> {
        let (_, password_hash) = self
            .users
            .get_with_hash_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)?;

        verify_password(old_password, &password_hash)?;

        if new_password != new_password_confirm {
            return Err(AccountError::PasswordMismatch);
        }
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }

    /// Edit a user's profile (username and email).
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UsernameTaken`/`EmailTaken` on uniqueness
    /// clashes, `UserNotFound` if the user disappeared.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        username: &str,
        email: &str,
    ) -> Result<User, AccountError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        let user = self.users.update_profile(user_id, &username, &email).await?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::UserNotFound` if the user doesn't exist.
    pub async fn user(&self, user_id: UserId) -> Result<User, AccountError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AccountError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(AccountError::InvalidCredentials)
        ));
    }
}
