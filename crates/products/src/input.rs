//! Unvalidated product input and the validation functions that check it.
//!
//! Inputs mirror what a caller may send: every field is optional so that a
//! missing field is reported as a violation rather than a parse failure.

use rust_decimal::Decimal;

use stockroom_core::{FieldViolation, Violations};

use crate::product::{Price, ProductDetails};

/// Field set for a full-replace write (create or update), not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
}

impl ProductChanges {
    pub fn new(name: impl Into<String>, price: Decimal, category: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            price: Some(price),
            category: Some(category.into()),
        }
    }

    /// Check every field; either all pass or every failure is reported.
    pub fn validate(self) -> Result<ProductDetails, Violations> {
        let mut violations = Violations::new();

        let name = violations.check(validate_name(self.name));
        let price = violations.check(validate_price(self.price));
        let category = violations.check(validate_category(self.category));

        match (name, price, category) {
            (Some(name), Some(price), Some(category)) => {
                Ok(ProductDetails::from_checked(name, price, category))
            }
            _ => Err(violations),
        }
    }
}

/// A product payload that may carry an identifier.
///
/// Creation ignores `id`; the body-keyed update requires it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductInput {
    pub id: Option<i64>,
    pub changes: ProductChanges,
}

impl ProductInput {
    pub fn new(id: Option<i64>, changes: ProductChanges) -> Self {
        Self { id, changes }
    }

    pub fn into_parts(self) -> (Option<i64>, ProductChanges) {
        (self.id, self.changes)
    }
}

pub fn validate_name(name: Option<String>) -> Result<String, FieldViolation> {
    non_blank("name", name)
}

pub fn validate_category(category: Option<String>) -> Result<String, FieldViolation> {
    non_blank("category", category)
}

pub fn validate_price(price: Option<Decimal>) -> Result<Price, FieldViolation> {
    match price {
        Some(value) => Price::new(value),
        None => Err(FieldViolation::new("price", "must not be null")),
    }
}

fn non_blank(field: &'static str, value: Option<String>) -> Result<String, FieldViolation> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(FieldViolation::new(field, "must not be blank")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_changes_validate() {
        let details = ProductChanges::new("Bolt 3in", Decimal::new(120, 2), "bolt")
            .validate()
            .unwrap();

        assert_eq!(details.name(), "Bolt 3in");
        assert_eq!(details.price().to_string(), "1.20");
        assert_eq!(details.category(), "bolt");
    }

    #[test]
    fn empty_changes_report_every_field() {
        let violations = ProductChanges::default().validate().unwrap_err();

        assert_eq!(violations.fields(), vec!["name", "price", "category"]);
        let price = violations.iter().find(|v| v.field == "price").unwrap();
        assert_eq!(price.message, "must not be null");
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let changes = ProductChanges::new(" \t\n", Decimal::ONE, "tools");
        let violations = changes.validate().unwrap_err();

        assert_eq!(violations.fields(), vec!["name"]);
    }

    #[test]
    fn surrounding_whitespace_is_preserved() {
        let details = ProductChanges::new(" Nut ", Decimal::ONE, "nut").validate().unwrap();
        assert_eq!(details.name(), " Nut ");
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: any non-blank text and in-range price validates, keeping the
            /// text as given.
            #[test]
            fn valid_inputs_always_pass(
                name in "[A-Za-z0-9][A-Za-z0-9 ]{0,40}",
                category in "[a-z][a-z_]{0,20}",
                cents in -9_999_999_999i64..=9_999_999_999i64,
            ) {
                let price = Decimal::new(cents, 2);
                let details = ProductChanges::new(name.clone(), price, category.clone())
                    .validate()
                    .unwrap();

                prop_assert_eq!(details.name(), name.as_str());
                prop_assert_eq!(details.category(), category.as_str());
                prop_assert_eq!(details.price().as_decimal(), Decimal::new(cents, 2));
            }

            /// Property: blank text is rejected no matter what the other fields hold.
            #[test]
            fn blank_name_always_fails(
                blank in "[ \t]{0,8}",
                cents in 0i64..1_000_000,
            ) {
                let violations = ProductChanges::new(blank, Decimal::new(cents, 2), "bolt")
                    .validate()
                    .unwrap_err();

                prop_assert_eq!(violations.fields(), vec!["name"]);
            }
        }
    }
}
