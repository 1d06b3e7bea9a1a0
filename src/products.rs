//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

use crate::tiers::QuantityTier;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone)]
pub struct Product<'a> {
    /// Product name
    pub name: String,

    /// Regular list price
    pub price: Money<'a, Currency>,

    /// Quantity price bands; empty when the product has no tier pricing
    pub tiers: Vec<QuantityTier<'a>>,
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use slotmap::SlotMap;

    use super::*;

    #[test]
    fn product_keys_are_distinct_per_insert() {
        let mut products = SlotMap::<ProductKey, Product<'_>>::with_key();

        let first = products.insert(Product {
            name: "Moka Pot".to_string(),
            price: Money::from_minor(3400, GBP),
            tiers: Vec::new(),
        });

        let second = products.insert(Product {
            name: "Burr Grinder".to_string(),
            price: Money::from_minor(14900, GBP),
            tiers: Vec::new(),
        });

        assert_ne!(first, second);
        assert_eq!(products.len(), 2);
    }
}
