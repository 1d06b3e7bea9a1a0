//! Souk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    bundles::{
        BundleError, BundleEvaluation, BundleQuote, evaluate_bundle, validate_bundle,
    },
    fixtures::{Fixture, FixtureError},
    items::{LineItem, LineTotalError},
    money::{MoneyMathError, amount_off, clamp_non_negative, fraction_of, percent_off},
    offers::{BundleOffer, Offer, OfferKey, OfferMeta, SpecialOffer},
    products::{Product, ProductKey},
    report::{BoardError, OfferBoard},
    specials::validate_special_price,
    taxes::{RegionScope, TaxError, TaxRate, TaxRule, apply_tax, select_tax_rule},
    tiers::{
        QuantityTier, TierBound, TierError, resolve_tier, resolve_tier_lenient, validate_tiers,
    },
    violations::{Violation, Violations},
    windows::{OfferStatus, TimeWindow, WindowError, classify, remaining_days},
};
