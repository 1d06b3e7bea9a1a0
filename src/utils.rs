//! Utils

use clap::Parser;
use jiff::Timestamp;

/// Arguments for the pricing desk demo
#[derive(Debug, Parser)]
pub struct PricingDeskArgs {
    /// Fixture set to load the catalog & offers from
    #[clap(short, long, default_value = "storefront")]
    pub fixture: String,

    /// Instant to evaluate offers at (RFC 3339); defaults to now
    #[clap(short, long)]
    pub at: Option<Timestamp>,

    /// Quantity to run through each product's tier pricing
    #[clap(short, long)]
    pub quantity: Option<u32>,
}
