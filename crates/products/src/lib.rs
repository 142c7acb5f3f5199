//! Products domain module.
//!
//! This crate contains the product entity, its price value object and the
//! validation rules for product input, implemented purely as deterministic
//! domain logic (no IO, no HTTP, no storage).

pub mod input;
pub mod product;

pub use input::{validate_category, validate_name, validate_price, ProductChanges, ProductInput};
pub use product::{Price, Product, ProductDetails, PRICE_PRECISION, PRICE_SCALE};
