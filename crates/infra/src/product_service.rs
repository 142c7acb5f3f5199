//! Product application service.
//!
//! This is the only place product business rules live. It sits between the
//! transport layer and a [`ProductStore`]:
//!
//! ```text
//! input
//!   ↓
//! 1. Validate fields (all violations reported together)
//!   ↓
//! 2. Begin a unit of work (mutations only)
//!   ↓
//! 3. Fetch the existing record (updates/deletes) → NotFound if absent
//!   ↓
//! 4. Mutate + save / delete
//!   ↓
//! 5. Commit
//! ```
//!
//! Mutations always fetch before writing, so a missing identifier surfaces as
//! `NotFound` instead of silently doing nothing. Nothing is retried here.

use tracing::{debug, info, instrument};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId};
use stockroom_products::{Product, ProductChanges, ProductInput};

use crate::store::{ProductRecord, ProductStore, ProductUnitOfWork, StoreError};

/// Product CRUD service over an injected store.
#[derive(Debug, Clone)]
pub struct ProductService<S> {
    store: S,
}

impl<S> ProductService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> ProductService<S>
where
    S: ProductStore,
{
    /// Persist a new product. Any identifier carried by `input` is ignored.
    #[instrument(skip(self, input), err)]
    pub async fn create(&self, input: ProductInput) -> DomainResult<Product> {
        let (ignored_id, changes) = input.into_parts();
        if let Some(id) = ignored_id {
            debug!(ignored_id = id, "create request carried an id; ignoring it");
        }

        let details = changes.validate()?;

        let mut uow = self.store.begin().await?;
        let product = uow.save(ProductRecord::New(details)).await?;
        uow.commit().await?;

        info!(product_id = %product.id(), "product created");
        Ok(product)
    }

    /// Every stored product, in ascending identifier order.
    #[instrument(skip(self), err)]
    pub async fn list_all(&self) -> DomainResult<Vec<Product>> {
        let products = self.store.find_all().await?;
        debug!(count = products.len(), "listed products");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn get_by_id(&self, id: ProductId) -> DomainResult<Product> {
        match self.store.find_by_id(id).await? {
            Some(product) => Ok(product),
            None => Err(not_found(id)),
        }
    }

    /// Full replace keyed by the identifier inside the payload.
    ///
    /// A missing or non-positive identifier is an `InvalidArgument`, checked
    /// before the fields are validated.
    #[instrument(skip(self, input), err)]
    pub async fn update_whole(&self, input: ProductInput) -> DomainResult<Product> {
        let (raw_id, changes) = input.into_parts();
        let id = match raw_id {
            None => return Err(DomainError::invalid_argument("Product ID must not be null")),
            Some(raw) => ProductId::new(raw).map_err(|_| {
                DomainError::invalid_argument(format!(
                    "Product ID must be a positive integer, got {raw}"
                ))
            })?,
        };

        self.replace(id, changes).await
    }

    /// Full replace keyed by an identifier taken from the addressing context.
    #[instrument(skip(self, changes), fields(product_id = %id), err)]
    pub async fn update_by_id(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> DomainResult<Product> {
        self.replace(id, changes).await
    }

    /// Permanently remove a product after checking that it exists.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_by_id(&self, id: ProductId) -> DomainResult<()> {
        let mut uow = self.store.begin().await?;
        let product = fetch_existing(uow.as_mut(), id).await?;
        uow.delete(&product)
            .await
            .map_err(|e| vanished_as_not_found(e, id))?;
        uow.commit().await?;

        info!(product_id = %id, "product deleted");
        Ok(())
    }

    async fn replace(&self, id: ProductId, changes: ProductChanges) -> DomainResult<Product> {
        let details = changes.validate()?;

        let mut uow = self.store.begin().await?;
        let mut product = fetch_existing(uow.as_mut(), id).await?;
        product.replace_details(details);
        let saved = uow
            .save(ProductRecord::Existing(product))
            .await
            .map_err(|e| vanished_as_not_found(e, id))?;
        uow.commit().await?;

        info!(product_id = %id, "product updated");
        Ok(saved)
    }
}

async fn fetch_existing(uow: &mut dyn ProductUnitOfWork, id: ProductId) -> DomainResult<Product> {
    match uow.find_by_id(id).await? {
        Some(product) => Ok(product),
        None => {
            debug!(product_id = %id, "product not found");
            Err(not_found(id))
        }
    }
}

/// A row removed by a concurrent writer between fetch and write is reported
/// the same way as one that was never there.
fn vanished_as_not_found(err: StoreError, id: ProductId) -> DomainError {
    match err {
        StoreError::RowMissing(_) => {
            debug!(product_id = %id, "product removed concurrently");
            not_found(id)
        }
        other => other.into(),
    }
}

fn not_found(id: ProductId) -> DomainError {
    DomainError::not_found(format!("Product not found with ID: {id}"))
}
