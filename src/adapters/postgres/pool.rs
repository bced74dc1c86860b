//! Connection pool and embedded migrations.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a pool sized from configuration.
#[tracing::instrument(skip_all, fields(max_connections = config.max_connections))]
pub async fn connect_pool(config: &DatabaseConfig, url: &str) -> Result<PgPool, DomainError> {
    tracing::info!(
        min_connections = config.min_connections,
        "connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect(url)
        .await
        .map_err(|e| DomainError::database("Failed to connect", e))?;

    tracing::info!("PostgreSQL connection pool established");
    Ok(pool)
}

#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    tracing::info!("running database migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DomainError::database("Migration failed", e))?;
    tracing::info!("database migrations complete");
    Ok(())
}
