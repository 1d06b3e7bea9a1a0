//! Quantity Tiers
//!
//! Tier pricing gives a product a different unit price depending on the
//! purchased quantity falling within a defined band. Bands are validated for
//! non-overlap when a set is created; resolution still detects overlap
//! rather than silently picking the first match.

use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::warn;

/// Errors specific to quantity tiers.
#[derive(Debug, Error, PartialEq)]
pub enum TierError {
    /// A tier's minimum quantity was below one.
    #[error("tier minimum quantity must be at least one, got {min_qty}")]
    MinimumBelowOne {
        /// The rejected minimum quantity.
        min_qty: u32,
    },

    /// A bounded tier closed at or below its own minimum.
    #[error("tier maximum {max_qty} must be greater than minimum {min_qty}")]
    EmptyRange {
        /// Lower bound of the tier.
        min_qty: u32,

        /// Upper bound of the tier.
        max_qty: u32,
    },

    /// Two tiers in one set cover overlapping quantity ranges.
    #[error("tiers starting at {first_min} and {second_min} overlap")]
    OverlappingTiers {
        /// Minimum quantity of the first overlapping tier.
        first_min: u32,

        /// Minimum quantity of the second overlapping tier.
        second_min: u32,
    },
}

/// Upper bound of a quantity tier.
///
/// Open-ended tiers say so explicitly; there is no magic "very large number"
/// standing in for no maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierBound {
    /// The tier closes at this quantity, inclusive.
    Bounded(u32),

    /// The tier has no upper limit.
    Unbounded,
}

impl TierBound {
    /// Returns whether a quantity sits at or below the bound.
    pub fn admits(self, quantity: u32) -> bool {
        match self {
            TierBound::Bounded(max_qty) => quantity <= max_qty,
            TierBound::Unbounded => true,
        }
    }
}

/// One price band: a quantity range and the unit price it earns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantityTier<'a> {
    min_qty: u32,
    max_qty: TierBound,
    unit_price: Money<'a, Currency>,
}

impl<'a> QuantityTier<'a> {
    /// Creates a tier covering `min_qty..=max_qty`.
    ///
    /// # Errors
    ///
    /// - [`TierError::MinimumBelowOne`] if `min_qty` is zero.
    /// - [`TierError::EmptyRange`] if a bounded maximum is not greater than
    ///   the minimum.
    pub fn new(
        min_qty: u32,
        max_qty: TierBound,
        unit_price: Money<'a, Currency>,
    ) -> Result<Self, TierError> {
        if min_qty < 1 {
            return Err(TierError::MinimumBelowOne { min_qty });
        }

        if let TierBound::Bounded(max) = max_qty
            && max <= min_qty
        {
            return Err(TierError::EmptyRange {
                min_qty,
                max_qty: max,
            });
        }

        Ok(Self {
            min_qty,
            max_qty,
            unit_price,
        })
    }

    /// Returns the minimum quantity of the tier, inclusive.
    pub fn min_qty(&self) -> u32 {
        self.min_qty
    }

    /// Returns the upper bound of the tier.
    pub fn max_qty(&self) -> TierBound {
        self.max_qty
    }

    /// Returns the unit price the tier earns.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns whether a quantity falls inside the tier.
    pub fn matches(&self, quantity: u32) -> bool {
        quantity >= self.min_qty && self.max_qty.admits(quantity)
    }

    /// Returns whether two tiers cover any quantity in common.
    fn overlaps(&self, other: &Self) -> bool {
        other.max_qty.admits(self.min_qty) && self.max_qty.admits(other.min_qty)
    }
}

/// Checks a tier set for overlapping quantity ranges.
///
/// Intended for creation time, before a set is stored against a product.
///
/// # Errors
///
/// Returns [`TierError::OverlappingTiers`] naming the first overlapping pair.
pub fn validate_tiers(tiers: &[QuantityTier<'_>]) -> Result<(), TierError> {
    for (idx, tier) in tiers.iter().enumerate() {
        for other in tiers.iter().skip(idx + 1) {
            if tier.overlaps(other) {
                return Err(TierError::OverlappingTiers {
                    first_min: tier.min_qty,
                    second_min: other.min_qty,
                });
            }
        }
    }

    Ok(())
}

/// Selects the tier covering a quantity.
///
/// Returns `Ok(None)` when no tier covers the quantity; the caller falls back
/// to the product's list price. A valid set has at most one covering tier, so
/// more than one match means the stored data is malformed and the resolution
/// fails rather than guessing.
///
/// # Errors
///
/// Returns [`TierError::OverlappingTiers`] if more than one tier covers the
/// quantity.
pub fn resolve_tier<'t, 'a>(
    tiers: &'t [QuantityTier<'a>],
    quantity: u32,
) -> Result<Option<&'t QuantityTier<'a>>, TierError> {
    let mut matches = tiers.iter().filter(|tier| tier.matches(quantity));

    let Some(first) = matches.next() else {
        return Ok(None);
    };

    if let Some(second) = matches.next() {
        return Err(TierError::OverlappingTiers {
            first_min: first.min_qty,
            second_min: second.min_qty,
        });
    }

    Ok(Some(first))
}

/// Selects a tier for a quantity, tolerating malformed sets.
///
/// When several tiers cover the quantity the one with the smallest minimum
/// wins and a warning is emitted. This is a fallback for stored data that
/// skipped validation, not the primary contract; prefer [`resolve_tier`].
pub fn resolve_tier_lenient<'t, 'a>(
    tiers: &'t [QuantityTier<'a>],
    quantity: u32,
) -> Option<&'t QuantityTier<'a>> {
    let mut matched = 0usize;

    let best = tiers
        .iter()
        .filter(|tier| tier.matches(quantity))
        .inspect(|_| matched += 1)
        .min_by_key(|tier| tier.min_qty);

    if matched > 1 {
        warn!(quantity, matched, "overlapping tiers; smallest minimum wins");
    }

    best
}
