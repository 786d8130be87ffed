//! Database migration command.
//!
//! Applies the storefront schema from `crates/storefront/migrations/` and
//! creates the `tower_sessions` table used by the session store.

use thiserror::Error;
use tower_sessions_sqlx_store::PostgresStore;

use nepal_clothing_storefront::config::{ConfigError, StorefrontConfig};
use nepal_clothing_storefront::db;

/// Errors that can occur while migrating.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run all storefront migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;

    tracing::info!("Connecting to storefront database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Creating session table...");
    PostgresStore::new(pool).migrate().await?;

    tracing::info!("Storefront migrations complete!");
    Ok(())
}
