use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use stockroom_core::{Entity, FieldViolation, ProductId, ValueObject, Violations};

use crate::input::{validate_category, validate_name};

/// Total number of significant digits a stored price may carry.
pub const PRICE_PRECISION: u32 = 10;

/// Number of fractional digits every stored price is normalised to.
pub const PRICE_SCALE: u32 = 2;

/// Product price: fixed-point decimal, `NUMERIC(10, 2)`.
///
/// Construction rounds half away from zero to [`PRICE_SCALE`] digits and
/// rejects values whose integer part does not fit in the remaining
/// `PRICE_PRECISION - PRICE_SCALE` digits.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    pub fn new(value: Decimal) -> Result<Self, FieldViolation> {
        let mut normalized =
            value.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
        normalized.rescale(PRICE_SCALE);

        if normalized.abs() >= Self::limit() {
            return Err(FieldViolation::new(
                "price",
                format!(
                    "must fit in {} digits with {} decimal places",
                    PRICE_PRECISION, PRICE_SCALE
                ),
            ));
        }

        Ok(Self(normalized))
    }

    /// Exclusive upper bound for the absolute value of a price.
    fn limit() -> Decimal {
        Decimal::from(10_i64.pow(PRICE_PRECISION - PRICE_SCALE))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl ValueObject for Price {}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = FieldViolation;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}

/// The mutable field set of a product, already validated.
///
/// Updates are full replaces of this value; there is no per-field patching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetails {
    name: String,
    price: Price,
    category: String,
}

impl ProductDetails {
    /// Validate and assemble a field set, reporting every rejected field.
    pub fn new(
        name: impl Into<String>,
        price: Price,
        category: impl Into<String>,
    ) -> Result<Self, Violations> {
        let mut violations = Violations::new();
        let name = violations.check(validate_name(Some(name.into())));
        let category = violations.check(validate_category(Some(category.into())));

        match (name, category) {
            (Some(name), Some(category)) => Ok(Self {
                name,
                price,
                category,
            }),
            _ => Err(violations),
        }
    }

    /// Assemble from parts that have each passed their field check.
    pub(crate) fn from_checked(name: String, price: Price, category: String) -> Self {
        Self {
            name,
            price,
            category,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl ValueObject for ProductDetails {}

/// Entity: a persisted product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    details: ProductDetails,
}

impl Product {
    pub fn new(id: ProductId, details: ProductDetails) -> Self {
        Self { id, details }
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn price(&self) -> Price {
        self.details.price()
    }

    pub fn category(&self) -> &str {
        self.details.category()
    }

    pub fn details(&self) -> &ProductDetails {
        &self.details
    }

    /// Overwrite every mutable field; the identifier is preserved.
    pub fn replace_details(&mut self, details: ProductDetails) {
        self.details = details;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Self::Id {
        self.id
    }
}
