use analytics::SourceError;
use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Database operation failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Refusing to record amount: {0}")]
    InvalidAmount(#[from] CoreError),
}

/// Every database failure looks the same to the analytics layer: the amounts
/// could not be read.
impl From<DbError> for SourceError {
    fn from(err: DbError) -> Self {
        SourceError::Unavailable(err.to_string())
    }
}
