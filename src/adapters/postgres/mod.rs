//! PostgreSQL adapters - Database implementations for the storage ports.
//!
//! - `PostgresSessionRegistry` - Session names claimed through a unique index
//! - `PostgresContentRepository` - Notes and file blobs keyed by session id
//!
//! Deleting a session row cascades to its notes and files.

mod content_repository;
mod session_registry;

pub use content_repository::PostgresContentRepository;
pub use session_registry::PostgresSessionRegistry;

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::config::DatabaseConfig;

/// Open a connection pool and optionally apply pending migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let mut options = PgConnectOptions::from_str(&config.url)?;
    if let Some(timeout) = config.statement_timeout_param() {
        options = options.options([("statement_timeout", timeout)]);
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout())
        .idle_timeout(config.idle_timeout())
        .connect_with(options)
        .await?;
    tracing::info!(url = %config.redacted_url(), "connected to postgres");

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("database migrations applied");
    }

    Ok(pool)
}
