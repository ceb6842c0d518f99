//! Database connection and pool management for Planvest
//!
//! PostgreSQL connection pooling, embedded migrations and health probing.

use serde::Serialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};

use crate::config::Config;

/// Database connection error
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Failed to connect to database: {0}")]
    ConnectionError(String),

    #[error("Failed to run migrations: {0}")]
    MigrationError(String),
}

/// Create the shared connection pool
pub async fn connect(config: &Config) -> Result<PgPool, DbError> {
    tracing::info!("Connecting to database at {}", config.database_url_masked());

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .idle_timeout(Duration::from_secs(600))
        .connect(&config.database_url)
        .await
        .map_err(|e| DbError::ConnectionError(e.to_string()))?;

    tracing::info!(
        max_connections = config.db_max_connections,
        "Database connection pool created"
    );

    Ok(pool)
}

/// Apply the migrations embedded from `backend/migrations`
pub async fn migrate(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| DbError::MigrationError(e.to_string()))?;

    tracing::info!("Database migrations completed");

    Ok(())
}

/// Result of a connectivity probe
#[derive(Debug, Clone, Serialize)]
pub struct DbHealth {
    pub connected: bool,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run a trivial query and time it
pub async fn probe(pool: &PgPool) -> DbHealth {
    let started = Instant::now();
    let result = sqlx::query("SELECT 1").execute(pool).await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(_) => DbHealth {
            connected: true,
            latency_ms,
            error: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            DbHealth {
                connected: false,
                latency_ms,
                error: Some(e.to_string()),
            }
        }
    }
}
