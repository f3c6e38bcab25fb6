//! Shopping cart and its line items.
//!
//! The cart is plain state owned by whoever drives the storefront; nothing in
//! the crate keeps a global cart.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::Product;
use crate::pricing::{PricingEngine, PricingError};

/// One configured product in a cart or order.
///
/// Orders keep a copy of every line as it was at checkout, including the
/// product snapshot, so later menu edits do not rewrite history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crust: Option<String>,
    #[serde(default)]
    pub toppings: BTreeSet<String>,
    pub quantity: NonZeroU32,
    /// Per-unit price fixed when the line was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price_override: Option<Decimal>,
}

impl CartLine {
    /// A single unit of `product` with no customization.
    pub fn plain(product: Product) -> Self {
        Self {
            product,
            size: None,
            crust: None,
            toppings: BTreeSet::new(),
            quantity: NonZeroU32::MIN,
            unit_price_override: None,
        }
    }

    pub fn unit_price(&self, engine: &PricingEngine) -> Result<Decimal, PricingError> {
        match self.unit_price_override {
            Some(price) => Ok(price),
            None => engine.unit_price(&self.product, self.size.as_deref(), &self.toppings),
        }
    }

    pub fn total(&self, engine: &PricingEngine) -> Result<Decimal, PricingError> {
        self.unit_price(engine)?
            .checked_mul(Decimal::from(self.quantity.get()))
            .ok_or(PricingError::Overflow)
    }

    /// Same product with the same choices.
    fn same_configuration(&self, other: &CartLine) -> bool {
        self.product.id == other.product.id
            && self.size == other.size
            && self.crust == other.crust
            && self.toppings == other.toppings
    }
}

/// The customer's in-progress selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, or bumps the quantity of an identical one already present.
    ///
    /// Returns the index of the line that now holds the units.
    pub fn add(&mut self, line: CartLine) -> usize {
        if let Some(index) = self.lines.iter().position(|l| l.same_configuration(&line)) {
            if let Some(existing) = self.lines.get_mut(index) {
                existing.quantity = existing.quantity.saturating_add(line.quantity.get());
            }
            index
        } else {
            self.lines.push(line);
            self.lines.len() - 1
        }
    }

    /// Sets the quantity of the line at `index`. Zero removes the line.
    ///
    /// Returns `false` when there is no such line.
    pub fn set_quantity(&mut self, index: usize, quantity: u32) -> bool {
        match NonZeroU32::new(quantity) {
            None => self.remove(index).is_some(),
            Some(quantity) => match self.lines.get_mut(index) {
                Some(line) => {
                    line.quantity = quantity;
                    true
                }
                None => false,
            },
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        (index < self.lines.len()).then(|| self.lines.remove(index))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines (the badge on the cart tab).
    pub fn item_count(&self) -> u64 {
        count_units(&self.lines)
    }

    pub fn total(&self, engine: &PricingEngine) -> Result<Decimal, PricingError> {
        sum_totals(&self.lines, engine)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Empties the cart and hands back its lines.
    pub fn take_lines(&mut self) -> Vec<CartLine> {
        std::mem::take(&mut self.lines)
    }
}

/// Units across `lines`, widened so a full line cannot wrap the count.
pub fn count_units(lines: &[CartLine]) -> u64 {
    lines.iter().map(|line| u64::from(line.quantity.get())).sum()
}

/// Sum of the line totals of `lines`.
pub fn sum_totals(lines: &[CartLine], engine: &PricingEngine) -> Result<Decimal, PricingError> {
    lines.iter().try_fold(Decimal::ZERO, |sum, line| {
        sum.checked_add(line.total(engine)?)
            .ok_or(PricingError::Overflow)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::pricing::Customization;

    fn pizza() -> Product {
        Product::new("1", "Pizza Margherita", Decimal::from(120), Category::Traditional)
    }

    fn soda() -> Product {
        Product::new("9", "Coca Cola", Decimal::from(25), Category::Drinks)
    }

    #[test]
    fn test_identical_lines_merge() {
        let mut cart = Cart::new();
        assert_eq!(cart.add(CartLine::plain(soda())), 0);
        assert_eq!(cart.add(CartLine::plain(soda())), 0);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_different_toppings_stay_separate() {
        let engine = PricingEngine::default();
        let product = pizza();
        let mut custom = Customization::defaults_for(&engine, &product);
        let plain = engine.customize(&product, &custom).unwrap();
        custom.toggle_topping("Piña");
        let with_pineapple = engine.customize(&product, &custom).unwrap();

        let mut cart = Cart::new();
        cart.add(plain);
        cart.add(with_pineapple);

        assert_eq!(cart.lines().len(), 2);
    }

    #[test]
    fn test_set_quantity_zero_removes() {
        let mut cart = Cart::new();
        cart.add(CartLine::plain(soda()));
        cart.add(CartLine::plain(pizza()));

        assert!(cart.set_quantity(0, 0));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].product.name, "Pizza Margherita");
        assert!(!cart.set_quantity(5, 0));
        assert!(!cart.set_quantity(5, 3));
    }

    #[test]
    fn test_total_uses_override_or_base() {
        let engine = PricingEngine::default();
        let mut cart = Cart::new();

        cart.add(CartLine::plain(soda()));
        let mut custom_line = CartLine::plain(pizza());
        custom_line.unit_price_override = Some(Decimal::from(195));
        cart.add(custom_line);
        cart.set_quantity(1, 2);

        // 25 + 195 × 2
        assert_eq!(cart.total(&engine), Ok(Decimal::from(415)));
    }

    #[test]
    fn test_line_without_override_is_priced_from_choices() {
        let engine = PricingEngine::default();
        let mut line = CartLine::plain(pizza());
        line.size = Some("Mediana (25cm)".to_string());
        line.toppings.insert("Pepperoni Extra".to_string());
        line.quantity = NonZeroU32::new(2).unwrap();

        assert_eq!(line.total(&engine), Ok(Decimal::from(390)));
    }

    #[test]
    fn test_full_lines_neither_wrap_nor_panic() {
        let engine = PricingEngine::default();
        let mut cart = Cart::new();
        let mut full = CartLine::plain(pizza());
        full.quantity = NonZeroU32::MAX;
        cart.add(full);
        cart.add(CartLine::plain(soda()));

        assert_eq!(cart.item_count(), u64::from(u32::MAX) + 1);
        // 120 × 4294967295 + 25
        assert_eq!(cart.total(&engine), Ok(Decimal::from(515_396_075_425u64)));

        let mut pricey = CartLine::plain(soda());
        pricey.unit_price_override = Some(Decimal::MAX);
        pricey.quantity = NonZeroU32::new(2).unwrap();
        assert_eq!(pricey.total(&engine), Err(PricingError::Overflow));

        cart.lines[1].unit_price_override = Some(Decimal::MAX);
        assert_eq!(cart.total(&engine), Err(PricingError::Overflow));
    }

    #[test]
    fn test_take_lines_empties_cart() {
        let mut cart = Cart::new();
        cart.add(CartLine::plain(soda()));
        let lines = cart.take_lines();
        assert_eq!(lines.len(), 1);
        assert!(cart.is_empty());
    }
}
