//! Embedded schema migrations.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure to connect or to apply a migration.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply migrations: {message}")]
pub struct MigrationError {
    message: String,
}

impl MigrationError {
    fn new(error: impl std::fmt::Display) -> Self {
        Self {
            message: error.to_string(),
        }
    }
}

/// Apply all pending migrations over a short-lived synchronous connection.
///
/// Blocking; call from `spawn_blocking` inside async code.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrationError> {
    let mut connection = PgConnection::establish(database_url).map_err(MigrationError::new)?;
    let applied = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(MigrationError::new)?;
    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
