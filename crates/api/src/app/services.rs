use std::sync::Arc;

use stockroom_infra::{
    config::{AppConfig, StoreConfig},
    db, InMemoryProductStore, PostgresProductStore, ProductService, ProductStore,
};

/// Which store the running service was wired with (for logs / diagnostics).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::InMemory => "in_memory",
            StoreBackend::Postgres => "postgres",
        }
    }
}

/// Everything request handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub products: ProductService<Arc<dyn ProductStore>>,
    pub backend: StoreBackend,
}

impl AppServices {
    pub fn new(store: Arc<dyn ProductStore>, backend: StoreBackend) -> Self {
        Self {
            products: ProductService::new(store),
            backend,
        }
    }

    /// In-memory wiring (dev/test).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryProductStore::new()), StoreBackend::InMemory)
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.store {
        StoreConfig::InMemory => {
            tracing::info!("using in-memory product store");
            Ok(AppServices::in_memory())
        }
        StoreConfig::Postgres {
            database_url,
            max_connections,
        } => build_persistent_services(database_url, *max_connections).await,
    }
}

async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
) -> anyhow::Result<AppServices> {
    let pool = db::connect(database_url, max_connections).await?;
    db::migrate(&pool).await?;

    tracing::info!(max_connections, "using Postgres product store");
    Ok(AppServices::new(
        Arc::new(PostgresProductStore::new(pool)),
        StoreBackend::Postgres,
    ))
}
