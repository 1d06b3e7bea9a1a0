//! Special Prices
//!
//! A special (flash) price is a time-bounded discounted price overriding a
//! product's regular price. The validation rules here are the same strict
//! ones the bundle validator applies to its price: a special price equal to
//! the regular price is not a saving and is rejected.

use rusty_money::{Money, MoneyError, iso::Currency};

use crate::{
    violations::{Violation, Violations},
    windows::TimeWindow,
};

/// Checks a proposed special price against its regular price and window.
///
/// Every broken rule is reported, one violation per offending field:
///
/// - the special price must be positive;
/// - the special price must be strictly below the regular price;
/// - the window must end after it starts.
///
/// # Errors
///
/// Returns [`MoneyError::CurrencyMismatch`] if the two prices are in
/// different currencies; that is a caller bug, not a form input problem.
pub fn validate_special_price(
    regular: Money<'_, Currency>,
    special: Money<'_, Currency>,
    window: &TimeWindow,
) -> Result<Violations, MoneyError> {
    // Surfaces the mismatch before any minor-unit comparison happens.
    let difference = regular.sub(special)?;

    let mut violations = Violations::new();

    if special.to_minor_units() <= 0 {
        violations.push(Violation::new(
            "special_price",
            "special price must be positive",
        ));
    }

    if difference.to_minor_units() <= 0 {
        violations.push(Violation::new(
            "special_price",
            "special price must be less than the regular price",
        ));
    }

    if window.end <= window.start {
        violations.push(Violation::new(
            "end_date",
            "end date must be after the start date",
        ));
    }

    Ok(violations)
}
