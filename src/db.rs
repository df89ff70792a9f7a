use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use thiserror::Error;

use crate::config::Settings;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Errors raised by the persistence layer
///
/// Unique constraint violations are kept apart from every other database
/// failure so callers can turn them into a duplicate-email response.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &error {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(
                    db_err.constraint().unwrap_or("unknown").to_string(),
                );
            }
        }
        StoreError::Database(error.to_string())
    }
}

/// Creates and configures a PostgreSQL connection pool
///
/// Connections are checked out per repository call and returned to the pool
/// when the call's guard is dropped, on success and on error alike.
///
/// # Arguments
/// * `settings` - Application settings holding the connection string and pool size
pub async fn create_pool(settings: &Settings) -> Result<DbPool, sqlx::Error> {
    tracing::debug!(
        "Creating database connection pool (max_connections={})",
        settings.max_connections
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Runs the embedded migrations against the pool
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_generic() {
        let err: StoreError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, StoreError::Database(_)));

        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
