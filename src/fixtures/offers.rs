//! Offer Fixtures

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for offers in YAML
#[derive(Debug, Deserialize)]
pub struct OffersFixture {
    /// Map of offer key -> offer fixture
    pub offers: FxHashMap<String, OfferFixture>,
}

/// Offer fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OfferFixture {
    /// Combo/bundle offer
    Bundle {
        /// Offer name
        name: String,

        /// Proposed price for the whole bundle (e.g., "249.00 EUR")
        bundle_price: String,

        /// Line items making up the bundle
        items: Vec<BundleItemFixture>,

        /// First instant the offer runs, inclusive (RFC 3339)
        starts: Timestamp,

        /// Last instant the offer runs, inclusive (RFC 3339)
        ends: Timestamp,

        /// Whether the offer is switched on; defaults to true
        #[serde(default = "default_enabled")]
        enabled: bool,
    },

    /// Special/flash price offer
    Special {
        /// Offer name
        name: String,

        /// Catalog key of the discounted product
        product: String,

        /// How the special price is derived from the regular price
        discount: SpecialDiscountFixture,

        /// First instant the offer runs, inclusive (RFC 3339)
        starts: Timestamp,

        /// Last instant the offer runs, inclusive (RFC 3339)
        ends: Timestamp,

        /// Whether the offer is switched on; defaults to true
        #[serde(default = "default_enabled")]
        enabled: bool,
    },
}

/// One bundle line in YAML
#[derive(Debug, Deserialize)]
pub struct BundleItemFixture {
    /// Catalog key of the product on the line
    pub product: String,

    /// Number of units on the line; defaults to one
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

/// Special price configuration from YAML
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SpecialDiscountFixture {
    /// The special price stated outright (e.g., "119.00 GBP")
    Price {
        /// The price string
        value: String,
    },

    /// A percentage off the regular price (e.g., "15%" or "0.15")
    PercentOff {
        /// The percentage string
        value: String,
    },

    /// A fixed amount off the regular price (e.g., "30.00 GBP")
    AmountOff {
        /// The amount string
        value: String,
    },
}

fn default_enabled() -> bool {
    true
}

fn default_quantity() -> u32 {
    1
}
