//! PostgreSQL connection pool setup

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::domain::DomainError;
use crate::infrastructure::migrations::run_schema_migrations;

/// Open a connection pool using the given database configuration
pub async fn connect_pool(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
}

/// Open a connection pool and apply pending schema migrations
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = connect_pool(config).await?;

    run_schema_migrations(&pool).await?;
    info!("Database schema is up to date");

    Ok(pool)
}
