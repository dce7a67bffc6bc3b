/// Schema migrations for the remote backend
///
/// Migrations live in `buildledger-shared/migrations/` and are embedded at
/// compile time. They create one JSONB document table per entity kind, each
/// with an indexed `country` column.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPool;
use tracing::{error, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Number of migrations compiled into this build
pub fn embedded_migrations() -> usize {
    MIGRATOR.iter().count()
}

/// Applies every pending migration
///
/// Called once while selecting the remote backend; a failure there makes
/// `remote` mode fatal and `auto` mode fall back to files.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    info!(embedded = embedded_migrations(), "Applying record table migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        error!(error = %e, "Record table migration failed");
        e
    })?;

    info!("Record tables up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tables_migration_embedded() {
        assert!(embedded_migrations() >= 1);
        assert!(MIGRATOR
            .iter()
            .any(|m| m.description.contains("record tables")));
    }
}
