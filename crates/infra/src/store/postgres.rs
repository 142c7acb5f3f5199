//! Postgres-backed product store.
//!
//! Maps onto the `products` table created by [`crate::db::migrate`]. Reads run
//! directly on the pool; every unit of work is one SQL transaction that locks
//! the row it fetches (`SELECT ... FOR UPDATE`). Concurrent writers to the same
//! product are therefore serialised: the later one sees the earlier one's
//! committed result, including a deletion.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{instrument, Span};

use stockroom_core::{Entity, ProductId};
use stockroom_products::{Price, Product, ProductDetails};

use super::r#trait::{ProductRecord, ProductStore, ProductUnitOfWork, StoreError};

const SELECT_BY_ID: &str = r#"
    SELECT id, name, price, category
    FROM products
    WHERE id = $1
"#;

/// Row-locking read used inside a unit of work. A concurrent writer on the
/// same id blocks here and re-reads once the holder commits.
const SELECT_BY_ID_FOR_UPDATE: &str = r#"
    SELECT id, name, price, category
    FROM products
    WHERE id = $1
    FOR UPDATE
"#;

/// Postgres product store.
///
/// Uses the SQLx connection pool, which is cheap to clone and thread-safe.
#[derive(Debug, Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(SELECT_BY_ID)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| product_from_row(&r)).transpose()
    }

    #[instrument(skip(self), fields(row_count), err)]
    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price, category
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_all", e))?;

        Span::current().record("row_count", rows.len());
        rows.iter().map(product_from_row).collect()
    }

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        Ok(Box::new(PostgresUnitOfWork { tx: Some(tx) }))
    }
}

/// One SQL transaction. Rolled back by sqlx if dropped before commit.
struct PostgresUnitOfWork {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PostgresUnitOfWork {
    fn tx(&mut self) -> Result<&mut Transaction<'static, Postgres>, StoreError> {
        self.tx.as_mut().ok_or(StoreError::AlreadyCommitted)
    }
}

#[async_trait]
impl ProductUnitOfWork for PostgresUnitOfWork {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let tx = self.tx()?;
        let row = sqlx::query(SELECT_BY_ID_FOR_UPDATE)
            .bind(id.get())
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.map(|r| product_from_row(&r)).transpose()
    }

    #[instrument(skip(self, record), err)]
    async fn save(&mut self, record: ProductRecord) -> Result<Product, StoreError> {
        let tx = self.tx()?;
        match record {
            ProductRecord::New(details) => {
                let row = sqlx::query(
                    r#"
                    INSERT INTO products (name, price, category)
                    VALUES ($1, $2, $3)
                    RETURNING id
                    "#,
                )
                .bind(details.name())
                .bind(details.price().as_decimal())
                .bind(details.category())
                .fetch_one(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("insert_product", e))?;

                let raw_id: i64 = row
                    .try_get("id")
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                let id = ProductId::new(raw_id).map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Product::new(id, details))
            }
            ProductRecord::Existing(product) => {
                let result = sqlx::query(
                    r#"
                    UPDATE products
                    SET name = $2, price = $3, category = $4
                    WHERE id = $1
                    "#,
                )
                .bind(product.id().get())
                .bind(product.name())
                .bind(product.price().as_decimal())
                .bind(product.category())
                .execute(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("update_product", e))?;

                if result.rows_affected() == 0 {
                    return Err(StoreError::RowMissing(product.id()));
                }
                Ok(product)
            }
        }
    }

    #[instrument(skip(self, product), fields(product_id = %product.id()), err)]
    async fn delete(&mut self, product: &Product) -> Result<(), StoreError> {
        let tx = self.tx()?;
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product.id().get())
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::RowMissing(product.id()));
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let tx = self.tx.take().ok_or(StoreError::AlreadyCommitted)?;
        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let price: Decimal = row.try_get("price").map_err(decode)?;
    let category: String = row.try_get("category").map_err(decode)?;

    let id = ProductId::new(id).map_err(|e| StoreError::Decode(e.to_string()))?;
    let price = Price::new(price).map_err(|v| StoreError::Decode(v.to_string()))?;
    let details =
        ProductDetails::new(name, price, category).map_err(|v| StoreError::Decode(v.to_string()))?;

    Ok(Product::new(id, details))
}

/// Map SQLx errors into store errors (connection-level vs statement-level).
fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => StoreError::Database {
            operation,
            message: db_err.message().to_string(),
        },
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {operation}"))
        }
        sqlx::Error::PoolTimedOut => {
            StoreError::Unavailable(format!("timed out acquiring a connection in {operation}"))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {operation}: {e}")),
        other => StoreError::Database {
            operation,
            message: other.to_string(),
        },
    }
}
