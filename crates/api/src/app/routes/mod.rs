use axum::{routing::get, Router};

pub mod products;
pub mod system;

/// Router for every product endpoint plus service metadata.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .route("/info", get(system::info))
        .merge(products::router())
}
