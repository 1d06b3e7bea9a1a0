//! Money arithmetic

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to money arithmetic helpers.
#[derive(Debug, Error)]
pub enum MoneyMathError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate a percentage of an amount in minor units.
///
/// The result is rounded to whole minor units, away from zero on midpoints,
/// so half a penny of discount always favours the customer.
///
/// # Errors
///
/// Returns [`MoneyMathError::PercentConversion`] if the multiplication
/// overflows or the result cannot be represented in minor units.
pub fn percent_of_minor(percent: Percentage, minor: i64) -> Result<i64, MoneyMathError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let Some(applied) = (percent * Decimal::ONE).checked_mul(minor) else {
        return Err(MoneyMathError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_i64() else {
        return Err(MoneyMathError::PercentConversion);
    };

    Ok(rounded)
}

/// Take a percentage off a price, never dropping below zero.
///
/// # Errors
///
/// Returns an error if the percentage cannot be safely applied or the
/// subtraction fails.
pub fn percent_off<'a>(
    price: Money<'a, Currency>,
    percent: Percentage,
) -> Result<Money<'a, Currency>, MoneyMathError> {
    let discount_minor = percent_of_minor(percent, price.to_minor_units())?;
    let discounted = price.sub(Money::from_minor(discount_minor, price.currency()))?;

    Ok(clamp_non_negative(discounted))
}

/// Take a fixed amount off a price, never dropping below zero.
///
/// # Errors
///
/// Returns an error if `amount` is in a different currency than `price`.
pub fn amount_off<'a>(
    price: Money<'a, Currency>,
    amount: Money<'a, Currency>,
) -> Result<Money<'a, Currency>, MoneyMathError> {
    Ok(clamp_non_negative(price.sub(amount)?))
}

/// Clamp a price at zero.
pub fn clamp_non_negative(price: Money<'_, Currency>) -> Money<'_, Currency> {
    Money::from_minor(0.max(price.to_minor_units()), price.currency())
}

/// Express one amount as a fraction of another.
///
/// The ratio is taken over minor units and is zero when `whole` is zero.
/// Percent savings is relative to the original (pre-discount) amount, so
/// the ratio is done in decimal space to avoid integer truncation.
pub fn fraction_of(part: Money<'_, Currency>, whole: Money<'_, Currency>) -> Percentage {
    let whole_minor = whole.to_minor_units();

    if whole_minor == 0 {
        return Percentage::from(0.0);
    }

    let part_dec = Decimal::from_i64(part.to_minor_units()).unwrap_or(Decimal::ZERO);
    let whole_dec = Decimal::from_i64(whole_minor).unwrap_or(Decimal::ZERO);

    Percentage::from(part_dec / whole_dec)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_returns_expected_amount() -> TestResult {
        let minor = percent_of_minor(Percentage::from(0.25), 200)?;

        assert_eq!(minor, 50);

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_midpoints_away_from_zero() -> TestResult {
        // 15% of 30 minor units is 4.5, which should round up to 5.
        let minor = percent_of_minor(Percentage::from(0.15), 30)?;

        assert_eq!(minor, 5);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(Percentage::from(Decimal::MAX), i64::MAX);

        assert!(matches!(result, Err(MoneyMathError::PercentConversion)));
    }

    #[test]
    fn percent_off_discounts_price() -> TestResult {
        let discounted = percent_off(Money::from_minor(200, GBP), Percentage::from(0.25))?;

        assert_eq!(discounted, Money::from_minor(150, GBP));

        Ok(())
    }

    #[test]
    fn percent_off_clamps_at_zero() -> TestResult {
        let discounted = percent_off(Money::from_minor(100, GBP), Percentage::from(1.5))?;

        assert_eq!(discounted, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn amount_off_discounts_price() -> TestResult {
        let discounted = amount_off(Money::from_minor(500, GBP), Money::from_minor(150, GBP))?;

        assert_eq!(discounted, Money::from_minor(350, GBP));

        Ok(())
    }

    #[test]
    fn amount_off_clamps_at_zero() -> TestResult {
        let discounted = amount_off(Money::from_minor(100, GBP), Money::from_minor(250, GBP))?;

        assert_eq!(discounted, Money::from_minor(0, GBP));

        Ok(())
    }

    #[test]
    fn amount_off_errors_on_currency_mismatch() {
        let result = amount_off(Money::from_minor(100, GBP), Money::from_minor(50, USD));

        assert!(matches!(result, Err(MoneyMathError::Money(_))));
    }

    #[test]
    fn clamp_non_negative_leaves_positive_prices_alone() {
        let price = clamp_non_negative(Money::from_minor(120, GBP));

        assert_eq!(price, Money::from_minor(120, GBP));
    }

    #[test]
    fn fraction_of_returns_ratio_of_minor_units() {
        let fraction = fraction_of(Money::from_minor(50, GBP), Money::from_minor(200, GBP));

        assert_eq!(fraction, Percentage::from(0.25));
    }

    #[test]
    fn fraction_of_is_zero_when_whole_is_zero() {
        let fraction = fraction_of(Money::from_minor(50, GBP), Money::from_minor(0, GBP));

        assert_eq!(fraction, Percentage::from(0.0));
    }

    #[test]
    fn fraction_of_is_negative_for_negative_part() {
        let fraction = fraction_of(Money::from_minor(-50, GBP), Money::from_minor(200, GBP));

        assert_eq!(fraction, Percentage::from(-0.25));
    }
}
