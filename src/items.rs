//! Line Items

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::products::ProductKey;

/// Errors specific to line totals.
#[derive(Debug, Error, PartialEq)]
pub enum LineTotalError {
    /// Unit price times quantity exceeded the representable minor unit range.
    #[error("line total overflows minor units: {unit_minor} x {quantity}")]
    Overflow {
        /// Unit price in minor units.
        unit_minor: i64,

        /// Number of units on the line.
        quantity: u32,
    },
}

/// One line of a quote: a product at a unit price, taken `quantity` times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem<'a> {
    product: ProductKey,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Creates a new line item.
    #[must_use]
    pub fn new(product: ProductKey, unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            product,
            unit_price,
            quantity,
        }
    }

    /// Returns the product on the line.
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Returns the unit price of the line.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the number of units on the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Calculates the total price of the line.
    ///
    /// # Errors
    ///
    /// Returns [`LineTotalError::Overflow`] if the multiplication does not
    /// fit in minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, LineTotalError> {
        let unit_minor = self.unit_price.to_minor_units();

        let total_minor =
            unit_minor
                .checked_mul(i64::from(self.quantity))
                .ok_or(LineTotalError::Overflow {
                    unit_minor,
                    quantity: self.quantity,
                })?;

        Ok(Money::from_minor(total_minor, self.unit_price.currency()))
    }
}
