//! Database wiring: connection pool and schema migration.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::store::StoreError;

const CREATE_PRODUCTS: &str = include_str!("../migrations/0001_create_products.sql");

/// Open a Postgres pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| StoreError::Unavailable(format!("failed to connect to Postgres: {e}")))
}

/// Create the `products` table if it does not exist yet. Idempotent.
pub async fn migrate(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(CREATE_PRODUCTS)
        .execute(pool)
        .await
        .map_err(|e| StoreError::Database {
            operation: "migrate",
            message: e.to_string(),
        })?;

    tracing::info!("products schema is up to date");
    Ok(())
}
