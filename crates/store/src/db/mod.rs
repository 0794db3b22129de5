//! Database operations for the store.
//!
//! # Database
//!
//! A single SQLite file holds everything:
//!
//! ## Tables
//!
//! - `users` - Accounts, roles, balances
//! - `products` - Catalog
//! - `cart_lines` - Open carts (one line per user/product pair)
//! - `transaction_history` - Completed purchases, append-only
//! - `tower_sessions` - Session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/store/migrations/` and run via:
//! ```bash
//! cargo run -p sundry-cli -- migrate
//! ```

pub mod cart;
pub mod products;
pub mod transactions;
pub mod users;

use std::str::FromStr;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use thiserror::Error;

/// Embedded migrations for the store schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was hit; the payload names the column.
    #[error("conflict on {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("row not found")]
    NotFound,

    /// A stored value failed to round-trip into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a SQLite connection pool with sensible defaults.
///
/// The database file is created if missing; foreign keys are enforced and
/// WAL mode keeps readers from blocking the single writer.
///
/// # Errors
///
/// Returns `sqlx::Error` if the URL is invalid or the connection fails.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Map a sqlx error to `Conflict` when it is a unique violation, naming the
/// offending column out of SQLite's "UNIQUE constraint failed: table.column"
/// message.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        let message = db_err.message();
        let column = message
            .rsplit('.')
            .next()
            .unwrap_or("unique")
            .trim()
            .to_owned();
        return RepositoryError::Conflict(column);
    }
    RepositoryError::Database(e)
}
