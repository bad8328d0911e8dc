//! Schema migrations, embedded at build time and applied on boot.

use sqlx::PgPool;
use tracing::info;

use huddle_core::error::{AppError, ErrorKind};

/// Bring the schema up to date, applying any migrations the database
/// has not yet seen. Safe to call on every startup; already-applied
/// versions are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let migrator = sqlx::migrate!("../../migrations");
    info!(versions = migrator.iter().count(), "Applying schema migrations");

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Schema is up to date");
    Ok(())
}
