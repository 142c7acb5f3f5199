//! Product persistence: the store boundary and its implementations.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use r#trait::{ProductRecord, ProductStore, ProductUnitOfWork, StoreError};
