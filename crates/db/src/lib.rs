//! Pageforge persistence layer.
//!
//! - [`store`] -- the record store trait, its in-memory and PostgreSQL
//!   adapters, and snapshot subscriptions.
//! - [`models`] -- typed page, layout and settings records plus their DTOs.
//! - [`repositories`] -- collection-level CRUD over a `&dyn RecordStore`.
//! - [`invariants`] -- the ordering and home-page exclusivity maintainers.

pub mod invariants;
pub mod models;
pub mod repositories;
pub mod store;

use sqlx::postgres::PgPoolOptions;

pub use store::{MemoryStore, PgStore, RecordStore, StoreError};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations in `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
