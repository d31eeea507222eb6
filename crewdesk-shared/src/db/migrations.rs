/// Schema migrations
///
/// Thin wrapper over sqlx's embedded migrator. Migration files live in the
/// `migrations/` directory at the workspace root and are compiled into the
/// binary, so deployments never need the source tree.
///
/// # Example
///
/// ```no_run
/// use crewdesk_shared::db::migrations::{ensure_database_exists, run_migrations};
/// use crewdesk_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let url = std::env::var("DATABASE_URL")?;
///     ensure_database_exists(&url).await?;
///
///     let pool = create_pool(DatabaseConfig {
///         url,
///         ..Default::default()
///     })
///     .await?;
///
///     run_migrations(&pool).await?;
///     Ok(())
/// }
/// ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Applies any migrations the database hasn't seen yet
///
/// Already-applied migrations are skipped, so calling this on every startup
/// is safe.
///
/// # Errors
///
/// Returns an error if a migration fails to execute or a previously applied
/// migration file has been modified.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Applying schema migrations");

    // Path is resolved relative to this crate's Cargo.toml
    let result = sqlx::migrate!("../migrations").run(pool).await;

    match &result {
        Ok(()) => info!("Schema is up to date"),
        Err(e) => warn!("Schema migration failed: {}", e),
    }

    result
}

/// Creates the target database when it is missing
///
/// Useful for development and test environments. Production databases should
/// be provisioned ahead of time.
///
/// # Errors
///
/// Returns an error if the PostgreSQL server is unreachable or the connected
/// role may not create databases.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    if Postgres::database_exists(database_url).await? {
        debug!("Target database already exists");
        return Ok(());
    }

    info!("Target database missing, creating it");
    Postgres::create_database(database_url).await?;
    info!("Database created");

    Ok(())
}
