//! Catalog Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::Product,
    tiers::{QuantityTier, TierBound, validate_tiers},
};

/// Wrapper for the product catalog in YAML
#[derive(Debug, Deserialize)]
pub struct CatalogFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Regular list price (e.g., "34.00 GBP")
    pub price: String,

    /// Quantity price bands, if the product has tier pricing
    #[serde(default)]
    pub tiers: Vec<TierFixture>,
}

/// One quantity price band from YAML
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Minimum quantity, inclusive
    pub min_qty: u32,

    /// Maximum quantity, inclusive, or the word `unbounded`
    pub max_qty: TierBoundFixture,

    /// Unit price earned inside the band
    pub unit_price: String,
}

/// Upper bound of a band as written in YAML: a number or `unbounded`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TierBoundFixture {
    /// The band closes at this quantity.
    Bounded(u32),

    /// Keyword form; only `unbounded` is accepted.
    Keyword(String),
}

impl TryFrom<TierBoundFixture> for TierBound {
    type Error = FixtureError;

    fn try_from(fixture: TierBoundFixture) -> Result<Self, Self::Error> {
        match fixture {
            TierBoundFixture::Bounded(max_qty) => Ok(TierBound::Bounded(max_qty)),
            TierBoundFixture::Keyword(word) if word == "unbounded" => Ok(TierBound::Unbounded),
            TierBoundFixture::Keyword(word) => Err(FixtureError::InvalidTierBound(word)),
        }
    }
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.price)?;
        let price = Money::from_minor(minor_units, currency);

        let tiers = fixture
            .tiers
            .into_iter()
            .map(|tier| {
                let (unit_minor, unit_currency) = parse_price(&tier.unit_price)?;

                if unit_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        currency.iso_alpha_code.to_string(),
                        unit_currency.iso_alpha_code.to_string(),
                    ));
                }

                Ok(QuantityTier::new(
                    tier.min_qty,
                    tier.max_qty.try_into()?,
                    Money::from_minor(unit_minor, unit_currency),
                )?)
            })
            .collect::<Result<Vec<_>, FixtureError>>()?;

        validate_tiers(&tiers)?;

        Ok(Product {
            name: fixture.name,
            price,
            tiers,
        })
    }
}

/// Parse price string (e.g., "2.99 GBP") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        "INR" => INR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed as a number.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value / 100.0))
    } else {
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
