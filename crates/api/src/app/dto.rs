use rust_decimal::Decimal;
use serde::Deserialize;

use stockroom_core::Entity;
use stockroom_products::{Product, ProductChanges, ProductInput};

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /products` and `PUT /products`.
///
/// Every field is optional at the JSON level so that missing values come back
/// as field violations instead of deserialization failures.
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

impl From<ProductRequest> for ProductInput {
    fn from(body: ProductRequest) -> Self {
        ProductInput::new(
            body.id,
            ProductChanges {
                name: body.name,
                price: body.price,
                category: body.category,
            },
        )
    }
}

/// Body of `PUT /products/{id}`; the identifier comes from the path.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

impl From<UpdateProductRequest> for ProductChanges {
    fn from(body: UpdateProductRequest) -> Self {
        ProductChanges {
            name: body.name,
            price: body.price,
            category: body.category,
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn product_to_json(product: &Product) -> serde_json::Value {
    serde_json::json!({
        "id": product.id().get(),
        "name": product.name(),
        "price": product.price(),
        "category": product.category(),
    })
}

pub fn message_json(message: &str) -> serde_json::Value {
    serde_json::json!({ "message": message })
}
