//! # Campus DB
//!
//! PostgreSQL pool construction and schema migrations.
//!
//! The pool is built once by the binary that needs it and passed down
//! explicitly (through `AppState` for the API, as a parameter for the sync
//! jobs). Call [`close_pool`] on shutdown.
//!
//! # Example
//!
//! ```ignore
//! use campus_config::DatabaseConfig;
//! use campus_db::{connect, run_migrations};
//!
//! let pool = connect(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

use campus_config::DatabaseConfig;
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Migrations embedded from the workspace `migrations/` directory.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Opens a connection pool sized from the configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(max_connections = config.max_connections, "Database pool opened");
    Ok(pool)
}

/// Builds a pool that only connects on first use.
///
/// Used where a state value is required but the code path under test never
/// reaches the database.
pub fn connect_lazy(url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new().max_connections(1).connect_lazy(url)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}

pub async fn close_pool(pool: &PgPool) {
    pool.close().await;
    info!("Database pool closed");
}
