//! Structured validation results.
//!
//! Input validation never stops at the first problem: every field is checked
//! and all violations are reported together.

use serde::Serialize;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl core::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered list of field violations (in the order fields were checked).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<FieldViolation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        Self(vec![FieldViolation::new(field, message)])
    }

    pub fn push(&mut self, violation: FieldViolation) {
        self.0.push(violation);
    }

    /// Record the error side of a field check and keep the value, if any.
    pub fn check<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(violation) => {
                self.push(violation);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|v| v.field).collect()
    }
}

impl From<FieldViolation> for Violations {
    fn from(value: FieldViolation) -> Self {
        Self(vec![value])
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, v) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("; ")?;
            }
            core::fmt::Display::fmt(v, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_collects_errors_and_keeps_values() {
        let mut violations = Violations::new();

        let a: Option<u32> = violations.check(Ok(1));
        let blank_name = FieldViolation::new("name", "must not be blank");
        let null_price = FieldViolation::new("price", "must not be null");
        let b: Option<u32> = violations.check(Err(blank_name));
        let c: Option<u32> = violations.check(Err(null_price));

        assert_eq!(a, Some(1));
        assert_eq!(b, None);
        assert_eq!(c, None);
        assert_eq!(violations.fields(), vec!["name", "price"]);
    }

    #[test]
    fn display_joins_violations_in_order() {
        let mut violations = Violations::single("name", "must not be blank");
        violations.push(FieldViolation::new("category", "must not be blank"));

        assert_eq!(
            violations.to_string(),
            "name: must not be blank; category: must not be blank"
        );
    }

    #[test]
    fn serializes_as_plain_array() {
        let violations = Violations::single("price", "must not be null");
        let json = serde_json::to_value(&violations).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{ "field": "price", "message": "must not be null" }])
        );
    }
}
