//! Bundles
//!
//! A combo offer sells a fixed set of distinct products together at a price
//! below the sum of their individual prices. Evaluation reports what the
//! numbers say, including a negative saving for an over-priced quote;
//! validation is the gate that rejects the underlying state before it is
//! submitted.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    items::{LineItem, LineTotalError},
    money::fraction_of,
    violations::{Violation, Violations},
};

/// Errors from bundle arithmetic.
///
/// These indicate caller bugs (mixed currencies, overflowing totals), not
/// user input problems; business-rule failures come back as [`Violations`].
#[derive(Debug, Error, PartialEq)]
pub enum BundleError {
    /// A line total exceeded the representable minor unit range.
    #[error(transparent)]
    LineTotal(#[from] LineTotalError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// A proposed combo offer: its line items and the asking price for the set.
#[derive(Debug, Clone)]
pub struct BundleQuote<'a> {
    items: Vec<LineItem<'a>>,
    bundle_price: Money<'a, Currency>,
}

impl<'a> BundleQuote<'a> {
    /// Creates a quote from line items and a proposed bundle price.
    ///
    /// Quotes are plain records; run [`validate_bundle`] before trusting one.
    #[must_use]
    pub fn new(items: Vec<LineItem<'a>>, bundle_price: Money<'a, Currency>) -> Self {
        Self {
            items,
            bundle_price,
        }
    }

    /// Returns the line items in the bundle.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Returns the proposed price for the whole bundle.
    pub fn bundle_price(&self) -> &Money<'a, Currency> {
        &self.bundle_price
    }

    /// Sums the line totals at their individual prices.
    ///
    /// # Errors
    ///
    /// Returns a [`BundleError`] if a line total overflows or the items mix
    /// currencies.
    pub fn original_total(&self) -> Result<Money<'a, Currency>, BundleError> {
        let zero = Money::from_minor(0, self.bundle_price.currency());

        let total = self
            .items
            .iter()
            .try_fold(zero, |acc, item| Ok::<_, BundleError>(acc.add(item.line_total()?)?))?;

        Ok(total)
    }
}

/// What a bundle is worth against buying its items individually.
#[derive(Debug, Clone, Copy)]
pub struct BundleEvaluation<'a> {
    /// Sum of the line totals at their individual prices.
    pub original_total: Money<'a, Currency>,

    /// Amount saved by buying the bundle instead; negative when the bundle
    /// price exceeds the original total.
    pub savings: Money<'a, Currency>,

    /// Savings as a fraction of the original total; zero when the original
    /// total is zero.
    pub savings_percent: Percentage,
}

impl BundleEvaluation<'_> {
    /// Savings percent rounded to one decimal percent point, for display.
    pub fn savings_percent_points(&self) -> Decimal {
        ((self.savings_percent * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(1)
    }
}

/// Evaluates a bundle quote against its items' individual prices.
///
/// Increasing the bundle price strictly decreases both the savings and the
/// savings percent. Quotes that violate the bundle invariants evaluate to a
/// negative saving rather than an error; use [`validate_bundle`] to gate.
///
/// # Errors
///
/// Returns a [`BundleError`] if a line total overflows or the quote mixes
/// currencies.
pub fn evaluate_bundle<'a>(quote: &BundleQuote<'a>) -> Result<BundleEvaluation<'a>, BundleError> {
    let original_total = quote.original_total()?;
    let savings = original_total.sub(*quote.bundle_price())?;
    let savings_percent = fraction_of(savings, original_total);

    Ok(BundleEvaluation {
        original_total,
        savings,
        savings_percent,
    })
}

/// Checks a bundle quote against the combo offer rules.
///
/// Every broken rule is reported, one violation per offending field, so a
/// form can show them all at once:
///
/// - at least two line items;
/// - every line quantity at least one;
/// - no product appearing on more than one line;
/// - a positive bundle price;
/// - a bundle price strictly below the original total (matching the bundle
///   price exactly is rejected).
///
/// # Errors
///
/// Returns a [`BundleError`] if a line total overflows or the quote mixes
/// currencies; those are caller bugs, not form input problems.
pub fn validate_bundle(quote: &BundleQuote<'_>) -> Result<Violations, BundleError> {
    let mut violations = Violations::new();

    if quote.items().len() < 2 {
        violations.push(Violation::new(
            "items",
            "a bundle needs at least two products",
        ));
    }

    for (idx, item) in quote.items().iter().enumerate() {
        if item.quantity() < 1 {
            violations.push(Violation::new(
                "items",
                format!("line {} quantity must be at least one", idx + 1),
            ));
        }
    }

    let mut seen = FxHashSet::default();

    if !quote.items().iter().all(|item| seen.insert(item.product())) {
        violations.push(Violation::new("items", "duplicate products are not allowed"));
    }

    if quote.bundle_price().to_minor_units() <= 0 {
        violations.push(Violation::new(
            "bundle_price",
            "bundle price must be positive",
        ));
    }

    let original_total = quote.original_total()?;
    let savings = original_total.sub(*quote.bundle_price())?;

    if savings.to_minor_units() <= 0 {
        violations.push(Violation::new(
            "bundle_price",
            "bundle price must be less than the total of its items",
        ));
    }

    Ok(violations)
}
