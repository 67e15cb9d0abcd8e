use crate::error::DbError;
use configuration::DatabaseSettings;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Establishes a connection pool to the PostgreSQL database.
///
/// The URL, pool size and acquire timeout all come from `DatabaseSettings`, so
/// the timeout is a deployment choice rather than a constant. The returned pool
/// is owned by the caller and should be closed on shutdown.
pub async fn connect(settings: &DatabaseSettings) -> Result<PgPool, DbError> {
    let database_url = settings.url.as_deref().ok_or_else(|| {
        DbError::ConnectionConfigError(
            "database.url or DATABASE_URL must be set.".to_string(),
        )
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(database_url)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        acquire_timeout = ?settings.acquire_timeout,
        "Connected to the database."
    );
    Ok(pool)
}

/// A utility function to run database migrations automatically.
///
/// This is useful for ensuring the database schema is up-to-date when the application starts,
/// which is especially important in production deployments.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    // Use a relative path from the crate root
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
