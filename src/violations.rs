//! Violations

use std::fmt;

use smallvec::SmallVec;

/// Field-level rule failures collected by a validator.
///
/// Validators report every broken rule in one pass, so a form can show all
/// of its messages at once instead of surfacing them one submit at a time.
pub type Violations = SmallVec<[Violation; 4]>;

/// A single broken business rule, tied to the form field that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    field: String,
    message: String,
}

impl Violation {
    /// Creates a violation for the given field.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the field the violation applies to.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the human-readable message for the violation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_constructor_values() {
        let violation = Violation::new("special_price", "special price must be positive");

        assert_eq!(violation.field(), "special_price");
        assert_eq!(violation.message(), "special price must be positive");
    }

    #[test]
    fn display_joins_field_and_message() {
        let violation = Violation::new("items", "a bundle needs at least two items");

        assert_eq!(
            violation.to_string(),
            "items: a bundle needs at least two items"
        );
    }

    #[test]
    fn violations_list_preserves_push_order() {
        let mut violations = Violations::new();

        violations.push(Violation::new("a", "first"));
        violations.push(Violation::new("b", "second"));

        let fields: Vec<&str> = violations.iter().map(Violation::field).collect();

        assert_eq!(fields, vec!["a", "b"]);
    }
}
