//! Souk
//!
//! Souk is a pricing and offer evaluation library for e-commerce back offices:
//! offer windows, quantity tiers, bundle pricing, special prices and tax
//! application, all as pure synchronous functions over typed money.

pub mod bundles;
pub mod fixtures;
pub mod items;
pub mod money;
pub mod offers;
pub mod prelude;
pub mod products;
pub mod report;
pub mod specials;
pub mod taxes;
pub mod tiers;
pub mod utils;
pub mod violations;
pub mod windows;
