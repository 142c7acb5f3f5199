use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};

use stockroom_core::{Entity, ProductId};
use stockroom_products::Product;

use super::r#trait::{ProductRecord, ProductStore, ProductUnitOfWork, StoreError};

#[derive(Debug, Clone, Default)]
struct State {
    rows: BTreeMap<ProductId, Product>,
    /// Highest identifier ever assigned; deleted identifiers are never reused.
    last_id: i64,
}

/// In-memory product store.
///
/// Intended for tests/dev. A unit of work holds the store lock until it is
/// committed or dropped, so writers are fully serialised and readers wait for
/// the current writer.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.rows.values().cloned().collect())
    }

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = State::clone(&guard);
        Ok(Box::new(InMemoryUnitOfWork {
            guard: Some(guard),
            staged: Some(staged),
        }))
    }
}

/// Changes are applied to a private copy and published on commit.
///
/// Both fields are `None` once committed; the store lock is released at that
/// point rather than when the unit of work is dropped.
struct InMemoryUnitOfWork {
    guard: Option<OwnedMutexGuard<State>>,
    staged: Option<State>,
}

impl InMemoryUnitOfWork {
    fn staged(&mut self) -> Result<&mut State, StoreError> {
        self.staged.as_mut().ok_or(StoreError::AlreadyCommitted)
    }
}

#[async_trait]
impl ProductUnitOfWork for InMemoryUnitOfWork {
    async fn find_by_id(&mut self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.staged()?.rows.get(&id).cloned())
    }

    async fn save(&mut self, record: ProductRecord) -> Result<Product, StoreError> {
        let state = self.staged()?;
        match record {
            ProductRecord::New(details) => {
                let next = state.last_id + 1;
                let id = ProductId::new(next).map_err(|e| StoreError::Decode(e.to_string()))?;
                state.last_id = next;

                let product = Product::new(id, details);
                state.rows.insert(id, product.clone());
                Ok(product)
            }
            ProductRecord::Existing(product) => {
                let id = product.id();
                match state.rows.get_mut(&id) {
                    Some(row) => {
                        *row = product.clone();
                        Ok(product)
                    }
                    None => Err(StoreError::RowMissing(id)),
                }
            }
        }
    }

    async fn delete(&mut self, product: &Product) -> Result<(), StoreError> {
        match self.staged()?.rows.remove(&product.id()) {
            Some(_) => Ok(()),
            None => Err(StoreError::RowMissing(product.id())),
        }
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let staged = self.staged.take().ok_or(StoreError::AlreadyCommitted)?;
        let mut guard = self.guard.take().ok_or(StoreError::AlreadyCommitted)?;
        *guard = staged;
        drop(guard);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use rust_decimal::Decimal;
    use stockroom_products::{Price, ProductDetails};

    fn details(name: &str) -> ProductDetails {
        ProductDetails::new(name, Price::new(Decimal::new(120, 2)).unwrap(), "bolt").unwrap()
    }

    async fn insert(store: &InMemoryProductStore, name: &str) -> Product {
        let mut uow = store.begin().await.unwrap();
        let product = uow.save(details(name).into()).await.unwrap();
        uow.commit().await.unwrap();
        product
    }

    #[tokio::test]
    async fn save_new_assigns_monotonic_identifiers() {
        let store = InMemoryProductStore::new();

        let a = insert(&store, "a").await;
        let b = insert(&store, "b").await;

        assert_eq!(a.id().get(), 1);
        assert_eq!(b.id().get(), 2);
        assert_eq!(store.find_all().await.unwrap(), vec![a, b]);
    }

    #[tokio::test]
    async fn deleted_identifiers_are_not_reused() {
        let store = InMemoryProductStore::new();
        let a = insert(&store, "a").await;

        let mut uow = store.begin().await.unwrap();
        uow.delete(&a).await.unwrap();
        uow.commit().await.unwrap();

        let b = insert(&store, "b").await;
        assert_eq!(b.id().get(), 2);
        assert_eq!(store.find_by_id(a.id()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_existing_updates_in_place() {
        let store = InMemoryProductStore::new();
        let mut product = insert(&store, "a").await;
        product.replace_details(details("renamed"));

        let mut uow = store.begin().await.unwrap();
        uow.save(product.clone().into()).await.unwrap();
        uow.commit().await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![product]);
    }

    #[tokio::test]
    async fn save_existing_without_row_fails() {
        let store = InMemoryProductStore::new();
        let ghost = Product::new(ProductId::new(99).unwrap(), details("ghost"));

        let mut uow = store.begin().await.unwrap();
        let err = uow.save(ghost.into()).await.unwrap_err();
        assert!(matches!(err, StoreError::RowMissing(id) if id.get() == 99));
    }

    #[tokio::test]
    async fn delete_without_row_fails() {
        let store = InMemoryProductStore::new();
        let ghost = Product::new(ProductId::new(3).unwrap(), details("ghost"));

        let mut uow = store.begin().await.unwrap();
        let err = uow.delete(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::RowMissing(id) if id.get() == 3));
    }

    #[tokio::test]
    async fn dropping_without_commit_discards_changes() {
        let store = InMemoryProductStore::new();

        {
            let mut uow = store.begin().await.unwrap();
            uow.save(details("a").into()).await.unwrap();
        }

        assert!(store.find_all().await.unwrap().is_empty());
        // The discarded insert does not burn an identifier either.
        assert_eq!(insert(&store, "b").await.id().get(), 1);
    }

    #[tokio::test]
    async fn commit_twice_is_rejected() {
        let store = InMemoryProductStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.commit().await.unwrap();

        assert!(matches!(uow.commit().await, Err(StoreError::AlreadyCommitted)));
    }

    #[tokio::test]
    async fn commit_releases_the_store_lock() {
        let store = InMemoryProductStore::new();

        let mut uow = store.begin().await.unwrap();
        let saved = uow.save(details("a").into()).await.unwrap();
        uow.commit().await.unwrap();

        // The unit of work is still in scope; reads and new writers must not wait on it.
        let all = tokio::time::timeout(Duration::from_secs(2), store.find_all())
            .await
            .expect("store lock still held after commit")
            .unwrap();
        assert_eq!(all, vec![saved]);

        let next = tokio::time::timeout(Duration::from_secs(2), store.begin())
            .await
            .expect("store lock still held after commit");
        assert!(next.is_ok());

        assert!(matches!(uow.commit().await, Err(StoreError::AlreadyCommitted)));
    }

    #[tokio::test]
    async fn missing_rows_are_absent_not_errors() {
        let store = InMemoryProductStore::new();
        let found = store.find_by_id(ProductId::new(1).unwrap()).await.unwrap();
        assert_eq!(found, None);
    }
}
