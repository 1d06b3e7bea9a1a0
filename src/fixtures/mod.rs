//! Fixtures
//!
//! YAML fixture sets for tests and demos: a product catalog and a set of
//! offers referencing it by string key. String prices and percentages are
//! coerced into typed money exactly once, here at the boundary; nothing
//! downstream ever sees a numeric string.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    bundles::BundleQuote,
    fixtures::{
        catalog::CatalogFixture,
        offers::{OfferFixture, OffersFixture, SpecialDiscountFixture},
    },
    items::LineItem,
    money::{MoneyMathError, amount_off, percent_off},
    offers::{BundleOffer, Offer, OfferKey, OfferMeta, SpecialOffer},
    products::{Product, ProductKey},
    tiers::TierError,
    windows::TimeWindow,
};

pub mod catalog;
pub mod offers;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Invalid tier bound keyword
    #[error("Invalid tier bound: expected a quantity or 'unbounded', got {0}")]
    InvalidTierBound(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Offer not found
    #[error("Offer not found: {0}")]
    OfferNotFound(String),

    /// Currency mismatch within the fixture set
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// An offer's window ends on or before it starts
    #[error("Offer {0} window must end after it starts")]
    InvalidWindow(String),

    /// Invalid tier data
    #[error(transparent)]
    Tier(#[from] TierError),

    /// Money arithmetic failed while deriving a special price
    #[error(transparent)]
    MoneyMath(#[from] MoneyMathError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// `SlotMaps` to store the actual types with generated keys
    product_meta: SlotMap<ProductKey, Product<'a>>,
    offer_meta: SlotMap<OfferKey, OfferMeta>,

    /// String key -> `SlotMap` key mappings for lookups
    product_keys: FxHashMap<String, ProductKey>,
    offer_keys: FxHashMap<String, OfferKey>,

    /// Pre-built offers (reference products by `ProductKey`)
    offers: Vec<Offer<'a>>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            product_meta: SlotMap::with_key(),
            offer_meta: SlotMap::with_key(),
            product_keys: FxHashMap::default(),
            offer_keys: FxHashMap::default(),
            offers: Vec::new(),
            currency: None,
        }
    }

    /// Load the product catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price or
    /// tier is malformed, or if products mix currencies.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalog").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        for (key, product_fixture) in fixture.products {
            // Parse to get currency first (before creating Product)
            let (_minor_units, currency) = catalog::parse_price(&product_fixture.price)?;

            self.ensure_currency(currency)?;

            let product: Product<'a> = product_fixture.try_into()?;
            let product_key = self.product_meta.insert(product);

            self.product_keys.insert(key, product_key);
        }

        debug!(
            name,
            products = self.product_keys.len(),
            "loaded catalog fixture"
        );

        Ok(self)
    }

    /// Load offers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a referenced
    /// product does not exist, if prices mix currencies, or if an offer's
    /// window ends on or before it starts.
    pub fn load_offers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("offers").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OffersFixture = serde_norway::from_str(&contents)?;

        for (key, offer_fixture) in fixture.offers {
            self.build_offer(&key, offer_fixture)?;
        }

        debug!(name, offers = self.offers.len(), "loaded offers fixture");

        Ok(self)
    }

    /// Load a complete fixture set (catalog and offers with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if either fixture file cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_catalog(name)?.load_offers(name)?;

        Ok(fixture)
    }

    fn build_offer(&mut self, key: &str, fixture: OfferFixture) -> Result<(), FixtureError> {
        let offer = match fixture {
            OfferFixture::Bundle {
                name,
                bundle_price,
                items,
                starts,
                ends,
                enabled,
            } => {
                let (price_minor, currency) = catalog::parse_price(&bundle_price)?;

                self.ensure_currency(currency)?;

                let mut line_items = Vec::with_capacity(items.len());

                for line in items {
                    let product_key = self.product_key(&line.product)?;
                    let product = self.product_checked(product_key, &line.product)?;

                    line_items.push(LineItem::new(product_key, product.price, line.quantity));
                }

                let window = offer_window(key, starts, ends, enabled)?;
                let offer_key = self.offer_meta.insert(OfferMeta { name });

                let quote = BundleQuote::new(line_items, Money::from_minor(price_minor, currency));

                self.offer_keys.insert(key.to_string(), offer_key);

                Offer::Bundle(BundleOffer::new(offer_key, quote, window))
            }
            OfferFixture::Special {
                name,
                product,
                discount,
                starts,
                ends,
                enabled,
            } => {
                let product_key = self.product_key(&product)?;
                let regular = self.product_checked(product_key, &product)?.price;

                let special = match discount {
                    SpecialDiscountFixture::Price { value } => {
                        let (minor, currency) = catalog::parse_price(&value)?;

                        if currency != regular.currency() {
                            return Err(FixtureError::CurrencyMismatch(
                                regular.currency().iso_alpha_code.to_string(),
                                currency.iso_alpha_code.to_string(),
                            ));
                        }

                        Money::from_minor(minor, currency)
                    }
                    SpecialDiscountFixture::PercentOff { value } => {
                        percent_off(regular, catalog::parse_percentage(&value)?)?
                    }
                    SpecialDiscountFixture::AmountOff { value } => {
                        let (minor, currency) = catalog::parse_price(&value)?;

                        amount_off(regular, Money::from_minor(minor, currency))?
                    }
                };

                let window = offer_window(key, starts, ends, enabled)?;
                let offer_key = self.offer_meta.insert(OfferMeta { name });

                self.offer_keys.insert(key.to_string(), offer_key);

                Offer::Special(SpecialOffer::new(offer_key, regular, special, window))
            }
        };

        self.offers.push(offer);

        Ok(())
    }

    fn ensure_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        if let Some(existing) = self.currency {
            if existing != currency {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        Ok(())
    }

    fn product_checked(
        &self,
        product_key: ProductKey,
        name: &str,
    ) -> Result<&Product<'a>, FixtureError> {
        self.product_meta
            .get(product_key)
            .ok_or_else(|| FixtureError::ProductNotFound(name.to_string()))
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&Product<'a>, FixtureError> {
        let product_key = self.product_key(key)?;

        self.product_checked(product_key, key)
    }

    /// Get a product key by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, key: &str) -> Result<ProductKey, FixtureError> {
        self.product_keys
            .get(key)
            .copied()
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get an offer by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the offer is not found.
    pub fn offer(&self, key: &str) -> Result<&Offer<'a>, FixtureError> {
        let offer_key = self
            .offer_keys
            .get(key)
            .ok_or_else(|| FixtureError::OfferNotFound(key.to_string()))?;

        self.offers
            .iter()
            .find(|offer| offer.key() == *offer_key)
            .ok_or_else(|| FixtureError::OfferNotFound(key.to_string()))
    }

    /// Get offer metadata by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the offer is not found.
    pub fn offer_meta(&self, key: &str) -> Result<&OfferMeta, FixtureError> {
        let offer_key = self
            .offer_keys
            .get(key)
            .ok_or_else(|| FixtureError::OfferNotFound(key.to_string()))?;

        self.offer_meta
            .get(*offer_key)
            .ok_or_else(|| FixtureError::OfferNotFound(key.to_string()))
    }

    /// Get all offers
    pub fn offers(&self) -> &[Offer<'a>] {
        &self.offers
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Get the product metadata `SlotMap`
    pub fn product_meta_map(&self) -> &SlotMap<ProductKey, Product<'a>> {
        &self.product_meta
    }

    /// Get the offer metadata `SlotMap`
    pub fn offer_meta_map(&self) -> &SlotMap<OfferKey, OfferMeta> {
        &self.offer_meta
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

fn offer_window(
    key: &str,
    starts: Timestamp,
    ends: Timestamp,
    enabled: bool,
) -> Result<TimeWindow, FixtureError> {
    if ends <= starts {
        return Err(FixtureError::InvalidWindow(key.to_string()));
    }

    Ok(TimeWindow {
        start: starts,
        end: ends,
        enabled,
    })
}
