//! Offers

use decimal_percentage::Percentage;
use jiff::Timestamp;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::new_key_type;

use crate::{
    bundles::BundleQuote,
    money::fraction_of,
    windows::{OfferStatus, TimeWindow, WindowError, classify},
};

new_key_type! {
    /// Offer Key
    pub struct OfferKey;
}

/// Offer metadata
#[derive(Debug, Clone, Default)]
pub struct OfferMeta {
    /// Offer name
    pub name: String,
}

/// A combo offer: a bundle quote scheduled inside a window.
#[derive(Debug, Clone)]
pub struct BundleOffer<'a> {
    key: OfferKey,
    quote: BundleQuote<'a>,
    window: TimeWindow,
}

impl<'a> BundleOffer<'a> {
    /// Creates a new bundle offer.
    #[must_use]
    pub fn new(key: OfferKey, quote: BundleQuote<'a>, window: TimeWindow) -> Self {
        Self { key, quote, window }
    }

    /// Returns the offer key.
    pub fn key(&self) -> OfferKey {
        self.key
    }

    /// Returns the bundle quote.
    pub fn quote(&self) -> &BundleQuote<'a> {
        &self.quote
    }

    /// Returns the scheduling window.
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }
}

/// A special price: a time-bounded override of a product's regular price.
#[derive(Debug, Clone)]
pub struct SpecialOffer<'a> {
    key: OfferKey,
    regular: Money<'a, Currency>,
    special: Money<'a, Currency>,
    window: TimeWindow,
}

impl<'a> SpecialOffer<'a> {
    /// Creates a new special-price offer.
    #[must_use]
    pub fn new(
        key: OfferKey,
        regular: Money<'a, Currency>,
        special: Money<'a, Currency>,
        window: TimeWindow,
    ) -> Self {
        Self {
            key,
            regular,
            special,
            window,
        }
    }

    /// Returns the offer key.
    pub fn key(&self) -> OfferKey {
        self.key
    }

    /// Returns the regular price being overridden.
    pub fn regular(&self) -> &Money<'a, Currency> {
        &self.regular
    }

    /// Returns the discounted special price.
    pub fn special(&self) -> &Money<'a, Currency> {
        &self.special
    }

    /// Returns the scheduling window.
    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    /// Calculates the saving against the regular price.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two prices cannot be subtracted.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.regular.sub(self.special)
    }

    /// Calculates the saving as a fraction of the regular price.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the two prices cannot be subtracted.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        Ok(fraction_of(self.savings()?, self.regular))
    }
}

/// Offer enum
#[derive(Debug, Clone)]
pub enum Offer<'a> {
    /// Combo/bundle offer
    Bundle(BundleOffer<'a>),

    /// Special/flash price offer
    Special(SpecialOffer<'a>),
}

impl Offer<'_> {
    /// Return the offer key.
    pub fn key(&self) -> OfferKey {
        match self {
            Offer::Bundle(bundle) => bundle.key(),
            Offer::Special(special) => special.key(),
        }
    }

    /// Return the scheduling window.
    pub fn window(&self) -> &TimeWindow {
        match self {
            Offer::Bundle(bundle) => bundle.window(),
            Offer::Special(special) => special.window(),
        }
    }

    /// Classify the offer's window against an instant.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidWindow`] if the window ends on or
    /// before it starts.
    pub fn status_at(&self, now: Timestamp) -> Result<OfferStatus, WindowError> {
        classify(self.window(), now)
    }

    /// Return whether the offer is switched on and running at an instant.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::InvalidWindow`] if the window ends on or
    /// before it starts.
    pub fn is_active_at(&self, now: Timestamp) -> Result<bool, WindowError> {
        self.window().is_active_at(now)
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::{Money, iso::GBP};
    use slotmap::SlotMap;
    use testresult::TestResult;

    use crate::{items::LineItem, products::ProductKey};

    use super::*;

    fn august_window() -> TestResult<TimeWindow> {
        Ok(TimeWindow::new(
            "2026-08-01T00:00:00Z".parse()?,
            "2026-08-31T23:59:59Z".parse()?,
        ))
    }

    fn special(window: TimeWindow) -> SpecialOffer<'static> {
        SpecialOffer::new(
            OfferKey::default(),
            Money::from_minor(20_000, GBP),
            Money::from_minor(15_000, GBP),
            window,
        )
    }

    #[test]
    fn key_delegates_to_inner_offer() -> TestResult {
        let mut keys = SlotMap::<OfferKey, ()>::with_key();
        let key = keys.insert(());

        let offer = Offer::Special(SpecialOffer::new(
            key,
            Money::from_minor(20_000, GBP),
            Money::from_minor(15_000, GBP),
            august_window()?,
        ));

        assert_eq!(offer.key(), key);
        assert_ne!(offer.key(), OfferKey::default());

        Ok(())
    }

    #[test]
    fn status_at_delegates_to_window_classification() -> TestResult {
        let window = august_window()?;

        let keys = ProductKey::default();
        let quote = BundleQuote::new(
            vec![
                LineItem::new(keys, Money::from_minor(100, GBP), 1),
                LineItem::new(keys, Money::from_minor(200, GBP), 1),
            ],
            Money::from_minor(250, GBP),
        );

        let offer = Offer::Bundle(BundleOffer::new(OfferKey::default(), quote, window));

        let before: Timestamp = "2026-07-01T00:00:00Z".parse()?;
        let inside: Timestamp = "2026-08-15T00:00:00Z".parse()?;

        assert_eq!(offer.status_at(before)?, OfferStatus::Upcoming);
        assert_eq!(offer.status_at(inside)?, OfferStatus::Current);
        assert!(offer.is_active_at(inside)?);

        Ok(())
    }

    #[test]
    fn disabled_offers_are_current_but_not_active() -> TestResult {
        let window = august_window()?;
        let offer = Offer::Special(special(TimeWindow::disabled(window.start, window.end)));

        let inside: Timestamp = "2026-08-15T00:00:00Z".parse()?;

        assert_eq!(offer.status_at(inside)?, OfferStatus::Current);
        assert!(!offer.is_active_at(inside)?);

        Ok(())
    }

    #[test]
    fn special_offer_reports_savings_and_percent() -> TestResult {
        let offer = special(august_window()?);

        assert_eq!(offer.savings()?, Money::from_minor(5_000, GBP));
        assert_eq!(offer.savings_percent()?, Percentage::from(0.25));

        Ok(())
    }
}
