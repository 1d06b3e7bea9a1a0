//! Taxes
//!
//! A tax rule adds a percentage of the price or a fixed amount on top of it,
//! optionally scoped to a shipping region. Picking which rule applies to an
//! order is a selection step; the arithmetic itself is region-agnostic.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to tax application.
#[derive(Debug, Error, PartialEq)]
pub enum TaxError {
    /// The rule carries a negative value, or a percentage above 100.
    #[error("invalid tax value: {reason}")]
    InvalidTaxValue {
        /// Which bound the value broke.
        reason: &'static str,
    },

    /// The tax amount could not be represented in minor units.
    #[error("tax conversion overflowed or was not finite")]
    Conversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// How a tax rule charges: a share of the price, or a flat surcharge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaxRate<'a> {
    /// Percent points of the base price (18 means 18%).
    Percentage(Decimal),

    /// A fixed amount added regardless of the base price.
    Fixed(Money<'a, Currency>),
}

/// A country, optionally narrowed to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionScope {
    /// ISO country code.
    pub country: String,

    /// State or province within the country.
    pub state: Option<String>,
}

impl RegionScope {
    /// Creates a country-wide scope.
    pub fn country(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: None,
        }
    }

    /// Creates a scope narrowed to one state.
    pub fn state(country: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: Some(state.into()),
        }
    }
}

/// A tax rule: its rate and the region it applies to, if any.
///
/// A rule without a region is global and matches every address.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxRule<'a> {
    /// How the rule charges.
    pub rate: TaxRate<'a>,

    /// Where the rule applies; `None` matches everywhere.
    pub region: Option<RegionScope>,
}

impl TaxRule<'_> {
    /// How specifically this rule matches an address, if it matches at all.
    ///
    /// A state-level match beats a country-level match beats a global rule.
    fn specificity(&self, address: &RegionScope) -> Option<u8> {
        let Some(region) = &self.region else {
            return Some(0);
        };

        if region.country != address.country {
            return None;
        }

        match &region.state {
            None => Some(1),
            Some(state) if Some(state) == address.state.as_ref() => Some(2),
            Some(_) => None,
        }
    }
}

/// Adds tax on top of a base price.
///
/// Percentage rates are applied in decimal space and rounded to whole minor
/// units, away from zero on midpoints.
///
/// # Errors
///
/// - [`TaxError::InvalidTaxValue`] if the rate is negative or a percentage
///   exceeds 100.
/// - [`TaxError::Conversion`] if the tax amount cannot be represented.
/// - [`TaxError::Money`] if a fixed amount is in a different currency than
///   the base price.
pub fn apply_tax<'a>(
    base: Money<'a, Currency>,
    rule: &TaxRule<'a>,
) -> Result<Money<'a, Currency>, TaxError> {
    match rule.rate {
        TaxRate::Percentage(points) => {
            if points < Decimal::ZERO {
                return Err(TaxError::InvalidTaxValue {
                    reason: "percentage must not be negative",
                });
            }

            if points > Decimal::ONE_HUNDRED {
                return Err(TaxError::InvalidTaxValue {
                    reason: "percentage must not exceed 100",
                });
            }

            let base_minor = Decimal::from_i64(base.to_minor_units()).ok_or(TaxError::Conversion)?;

            let tax = base_minor
                .checked_mul(points)
                .and_then(|value| value.checked_div(Decimal::ONE_HUNDRED))
                .ok_or(TaxError::Conversion)?;

            let tax_minor = tax
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
                .ok_or(TaxError::Conversion)?;

            Ok(base.add(Money::from_minor(tax_minor, base.currency()))?)
        }
        TaxRate::Fixed(amount) => {
            if amount.to_minor_units() < 0 {
                return Err(TaxError::InvalidTaxValue {
                    reason: "fixed amount must not be negative",
                });
            }

            Ok(base.add(amount)?)
        }
    }
}

/// Picks the tax rule that applies to a shipping address.
///
/// The most specific matching rule wins: a state-scoped rule beats a
/// country-scoped one, which beats a global rule. Ties go to the earlier
/// rule in the list. Returns `None` when no rule matches.
pub fn select_tax_rule<'r, 'a>(
    rules: &'r [TaxRule<'a>],
    address: &RegionScope,
) -> Option<&'r TaxRule<'a>> {
    let mut best: Option<(u8, &'r TaxRule<'a>)> = None;

    for rule in rules {
        if let Some(score) = rule.specificity(address)
            && best.is_none_or(|(held, _)| score > held)
        {
            best = Some((score, rule));
        }
    }

    best.map(|(_, rule)| rule)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percentage_tax_adds_a_share_of_the_price() -> TestResult {
        let rule = TaxRule {
            rate: TaxRate::Percentage(Decimal::new(18, 0)),
            region: None,
        };

        let taxed = apply_tax(Money::from_minor(10_000, GBP), &rule)?;

        assert_eq!(taxed, Money::from_minor(11_800, GBP));

        Ok(())
    }

    #[test]
    fn fixed_tax_adds_a_flat_amount() -> TestResult {
        let rule = TaxRule {
            rate: TaxRate::Fixed(Money::from_minor(5_000, GBP)),
            region: None,
        };

        let taxed = apply_tax(Money::from_minor(10_000, GBP), &rule)?;

        assert_eq!(taxed, Money::from_minor(15_000, GBP));

        Ok(())
    }

    #[test]
    fn percentage_tax_rounds_midpoints_away_from_zero() -> TestResult {
        // 5% of 30 minor units is 1.5, which should round up to 2.
        let rule = TaxRule {
            rate: TaxRate::Percentage(Decimal::new(5, 0)),
            region: None,
        };

        let taxed = apply_tax(Money::from_minor(30, GBP), &rule)?;

        assert_eq!(taxed, Money::from_minor(32, GBP));

        Ok(())
    }

    #[test]
    fn negative_percentage_is_rejected() {
        let rule = TaxRule {
            rate: TaxRate::Percentage(Decimal::new(-1, 0)),
            region: None,
        };

        assert!(matches!(
            apply_tax(Money::from_minor(10_000, GBP), &rule),
            Err(TaxError::InvalidTaxValue { .. })
        ));
    }

    #[test]
    fn percentage_above_one_hundred_is_rejected() {
        let rule = TaxRule {
            rate: TaxRate::Percentage(Decimal::new(101, 0)),
            region: None,
        };

        assert!(matches!(
            apply_tax(Money::from_minor(10_000, GBP), &rule),
            Err(TaxError::InvalidTaxValue { .. })
        ));
    }

    #[test]
    fn negative_fixed_amount_is_rejected() {
        let rule = TaxRule {
            rate: TaxRate::Fixed(Money::from_minor(-100, GBP)),
            region: None,
        };

        assert!(matches!(
            apply_tax(Money::from_minor(10_000, GBP), &rule),
            Err(TaxError::InvalidTaxValue { .. })
        ));
    }

    #[test]
    fn fixed_amount_in_another_currency_is_a_money_error() {
        let rule = TaxRule {
            rate: TaxRate::Fixed(Money::from_minor(100, USD)),
            region: None,
        };

        assert!(matches!(
            apply_tax(Money::from_minor(10_000, GBP), &rule),
            Err(TaxError::Money(_))
        ));
    }

    #[test]
    fn exactly_one_hundred_percent_doubles_the_price() -> TestResult {
        let rule = TaxRule {
            rate: TaxRate::Percentage(Decimal::ONE_HUNDRED),
            region: None,
        };

        let taxed = apply_tax(Money::from_minor(10_000, GBP), &rule)?;

        assert_eq!(taxed, Money::from_minor(20_000, GBP));

        Ok(())
    }

    fn region_rules() -> Vec<TaxRule<'static>> {
        vec![
            TaxRule {
                rate: TaxRate::Percentage(Decimal::new(20, 0)),
                region: None,
            },
            TaxRule {
                rate: TaxRate::Percentage(Decimal::new(10, 0)),
                region: Some(RegionScope::country("IN")),
            },
            TaxRule {
                rate: TaxRate::Percentage(Decimal::new(18, 0)),
                region: Some(RegionScope::state("IN", "MH")),
            },
        ]
    }

    #[test]
    fn select_prefers_state_over_country_over_global() {
        let rules = region_rules();

        let state = select_tax_rule(&rules, &RegionScope::state("IN", "MH"));
        let country = select_tax_rule(&rules, &RegionScope::state("IN", "KA"));
        let global = select_tax_rule(&rules, &RegionScope::country("FR"));

        assert_eq!(
            state.map(|rule| &rule.rate),
            Some(&TaxRate::Percentage(Decimal::new(18, 0))),
            "a state match beats the country rule"
        );
        assert_eq!(
            country.map(|rule| &rule.rate),
            Some(&TaxRate::Percentage(Decimal::new(10, 0))),
            "an unmatched state falls back to the country rule"
        );
        assert_eq!(
            global.map(|rule| &rule.rate),
            Some(&TaxRate::Percentage(Decimal::new(20, 0))),
            "a foreign address falls back to the global rule"
        );
    }

    #[test]
    fn select_returns_none_without_a_matching_rule() {
        let rules = vec![TaxRule {
            rate: TaxRate::Percentage(Decimal::new(10, 0)),
            region: Some(RegionScope::country("IN")),
        }];

        assert_eq!(select_tax_rule(&rules, &RegionScope::country("FR")), None);
    }
}
