//! Infrastructure layer: product stores, database wiring, configuration and
//! the product service that orchestrates them.

pub mod config;
pub mod db;
pub mod product_service;
pub mod store;

pub use config::{AppConfig, ConfigError, StoreConfig};
pub use product_service::ProductService;
pub use store::{InMemoryProductStore, PostgresProductStore, ProductStore, StoreError};
