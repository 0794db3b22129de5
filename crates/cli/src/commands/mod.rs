//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::SqlitePool;

use sundry_store::config::Config;
use sundry_store::db;

/// Load configuration and open the database pool the commands work against.
pub(crate) async fn connect() -> Result<SqlitePool, Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let pool = db::create_pool(&config.database_url).await?;
    Ok(pool)
}
