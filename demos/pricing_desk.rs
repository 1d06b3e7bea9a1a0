//! Pricing Desk Demo
//!
//! Loads a fixture set and renders the offer board as of a chosen instant.
//!
//! Use `-f` to load a fixture set by name
//! Use `-a` to evaluate the offers at an RFC 3339 instant instead of now
//! Use `-q` to run a quantity through each product's tier pricing

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};
use jiff::Timestamp;

use souk::{
    fixtures::Fixture,
    report::OfferBoard,
    tiers::resolve_tier,
    utils::PricingDeskArgs,
};

/// Pricing Desk Demo
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = PricingDeskArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;

    // The one place "now" is ambient; the library always takes it as input.
    let now = args.at.unwrap_or_else(Timestamp::now);

    let start = Instant::now();

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    OfferBoard::at(now).write_to(&mut handle, fixture.offers(), fixture.offer_meta_map())?;

    if let Some(quantity) = args.quantity {
        println!("Tier pricing at quantity {quantity}:");

        for product in fixture.product_meta_map().values() {
            if product.tiers.is_empty() {
                continue;
            }

            match resolve_tier(&product.tiers, quantity)? {
                Some(tier) => {
                    println!("  {}: {} per unit", product.name, tier.unit_price());
                }
                None => {
                    println!("  {}: {} per unit (list price)", product.name, product.price);
                }
            }
        }

        println!();
    }

    println!("Rendered in {}", start.elapsed().human(Truncate::Nano));

    Ok(())
}
