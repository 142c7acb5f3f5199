use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use stockroom_core::{DomainError, ProductId};
use stockroom_products::{Product, ProductDetails};

/// What a unit of work is asked to persist.
///
/// - `New`: no identifier yet; the store inserts and assigns a fresh one.
/// - `Existing`: carries its identifier; the store updates that row in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRecord {
    New(ProductDetails),
    Existing(Product),
}

impl From<ProductDetails> for ProductRecord {
    fn from(value: ProductDetails) -> Self {
        Self::New(value)
    }
}

impl From<Product> for ProductRecord {
    fn from(value: Product) -> Self {
        Self::Existing(value)
    }
}

/// Store failures. None of these are caller mistakes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    #[error("failed to decode product row: {0}")]
    Decode(String),

    #[error("product {0} vanished during update")]
    RowMissing(ProductId),

    #[error("unit of work already committed")]
    AlreadyCommitted,
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::unexpected(value.to_string())
    }
}

/// Persistence boundary for products.
///
/// Reads go straight to the store. Writes go through a [`ProductUnitOfWork`]
/// obtained from [`ProductStore::begin`], so a fetch-mutate-save sequence is
/// atomic with respect to other callers.
///
/// `find_by_id` reports a missing row as `Ok(None)`, never as an error.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// All products in ascending identifier (insertion) order.
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, StoreError>;
}

/// A single transaction against the store.
///
/// Dropping a unit of work without calling [`commit`](Self::commit) discards
/// every change made through it.
#[async_trait]
pub trait ProductUnitOfWork: Send {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a `New` record (assigning an unused identifier) or update an
    /// `Existing` one in place. Returns the persisted representation.
    async fn save(&mut self, record: ProductRecord) -> Result<Product, StoreError>;

    async fn delete(&mut self, product: &Product) -> Result<(), StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        (**self).find_all().await
    }

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, StoreError> {
        (**self).begin().await
    }
}
