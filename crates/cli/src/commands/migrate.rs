//! Database migration command.
//!
//! Applies the embedded store migrations. The session table is managed by
//! the session store at server startup, not here.

use sundry_store::db::MIGRATOR;

/// Run all pending migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let pool = super::connect().await?;

    tracing::info!("Running store migrations...");
    MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
