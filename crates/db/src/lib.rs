//! Postgres data-access layer for the music library.
//!
//! - [`models`]: row types and request DTOs.
//! - [`query`]: the filter compiler and the listing query assembler.
//! - [`repositories`]: CRUD operations, each taking its executor explicitly.
//! - [`transaction`]: closure-scoped transactions.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod query;
pub mod repositories;
pub mod transaction;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
