//! Pricing engine for configured line items.
//!
//! A line's price is
//!
//! ```text
//! (base_price × size_multiplier + Σ topping prices) × quantity
//! ```
//!
//! Sizes and toppings are looked up first in the product's own option lists
//! and otherwise in the engine's defaults. Unknown size names price at ×1 and
//! unknown topping names contribute nothing: the storefront only ever offers
//! names it got from these same lists.
//!
//! All arithmetic is exact [`Decimal`]; round only when displaying.

use std::collections::BTreeSet;
use std::num::NonZeroU32;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::{CartLine, Product, SizeOption, ToppingOption};

/// Errors raised while pricing a line.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PricingError {
    /// Quantities start at one; a zero-quantity line is rejected, not clamped.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// The amount does not fit in a `Decimal`.
    #[error("price is too large")]
    Overflow,
}

/// Prices line items against a product plus fallback option lists.
///
/// The engine holds no mutable state. Cloning it or sharing it across tasks
/// is fine.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingEngine {
    sizes: Vec<SizeOption>,
    crusts: Vec<String>,
    toppings: Vec<ToppingOption>,
}

impl Default for PricingEngine {
    /// The house option lists.
    fn default() -> Self {
        let sizes = vec![
            SizeOption::new("Personal (20cm)", Decimal::ONE),
            SizeOption::new("Mediana (25cm)", Decimal::new(15, 1)),
            SizeOption::new("Familiar (30cm)", Decimal::TWO),
        ];

        let crusts = ["Masa Tradicional", "Masa Delgada", "Masa Gruesa", "Masa Integral"]
            .into_iter()
            .map(String::from)
            .collect();

        let toppings = [
            ("Pepperoni Extra", 15),
            ("Champiñones", 10),
            ("Pimientos", 8),
            ("Cebolla", 8),
            ("Aceitunas", 12),
            ("Jamón", 15),
            ("Salchicha", 15),
            ("Piña", 10),
            ("Tomate Cherry", 12),
            ("Queso Extra", 20),
            ("Jalapeños", 8),
            ("Tocino", 18),
            ("Pollo", 20),
            ("Carne Molida", 22),
            ("Anchoas", 15),
        ]
        .into_iter()
        .map(|(name, price)| ToppingOption::new(name, Decimal::from(price)))
        .collect();

        Self::new(sizes, crusts, toppings)
    }
}

impl PricingEngine {
    /// Builds an engine with caller-supplied fallback lists.
    pub fn new(sizes: Vec<SizeOption>, crusts: Vec<String>, toppings: Vec<ToppingOption>) -> Self {
        Self {
            sizes,
            crusts,
            toppings,
        }
    }

    pub fn sizes_for<'a>(&'a self, product: &'a Product) -> &'a [SizeOption] {
        product.sizes.as_deref().unwrap_or(&self.sizes)
    }

    pub fn crusts_for<'a>(&'a self, product: &'a Product) -> &'a [String] {
        product.crusts.as_deref().unwrap_or(&self.crusts)
    }

    pub fn toppings_for<'a>(&'a self, product: &'a Product) -> &'a [ToppingOption] {
        product.toppings.as_deref().unwrap_or(&self.toppings)
    }

    /// Multiplier for `size`, or one when the size is absent or unknown.
    pub fn size_multiplier(&self, product: &Product, size: Option<&str>) -> Decimal {
        size.and_then(|name| {
            self.sizes_for(product)
                .iter()
                .find(|option| option.name == name)
        })
        .map_or(Decimal::ONE, |option| option.multiplier)
    }

    /// Sum of the listed prices of `toppings`.
    ///
    /// Callers pass each name once; a name given twice is charged twice.
    pub fn topping_total<I, S>(&self, product: &Product, toppings: I) -> Result<Decimal, PricingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options = self.toppings_for(product);
        toppings
            .into_iter()
            .filter_map(|name| {
                options
                    .iter()
                    .find(|option| option.name == name.as_ref())
                    .map(|option| option.price)
            })
            .try_fold(Decimal::ZERO, |sum, price| {
                sum.checked_add(price).ok_or(PricingError::Overflow)
            })
    }

    /// Price of a single unit with the given configuration.
    pub fn unit_price<I, S>(
        &self,
        product: &Product,
        size: Option<&str>,
        toppings: I,
    ) -> Result<Decimal, PricingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let toppings = self.topping_total(product, toppings)?;
        product
            .base_price
            .checked_mul(self.size_multiplier(product, size))
            .and_then(|sized| sized.checked_add(toppings))
            .ok_or(PricingError::Overflow)
    }

    /// Price of `quantity` units with the given configuration.
    ///
    /// # Errors
    ///
    /// [`PricingError::ZeroQuantity`] when `quantity` is zero, and
    /// [`PricingError::Overflow`] when the amount does not fit.
    pub fn line_price<I, S>(
        &self,
        product: &Product,
        size: Option<&str>,
        toppings: I,
        quantity: u32,
    ) -> Result<Decimal, PricingError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if quantity == 0 {
            return Err(PricingError::ZeroQuantity);
        }
        self.unit_price(product, size, toppings)?
            .checked_mul(Decimal::from(quantity))
            .ok_or(PricingError::Overflow)
    }

    /// Turns a finished customization into a cart line.
    ///
    /// The line carries the computed unit price as its override so later
    /// menu changes do not reprice what the customer already saw.
    ///
    /// # Errors
    ///
    /// [`PricingError::ZeroQuantity`] when the customization has no units, and
    /// [`PricingError::Overflow`] when the unit price does not fit.
    pub fn customize(
        &self,
        product: &Product,
        customization: &Customization,
    ) -> Result<CartLine, PricingError> {
        let quantity = NonZeroU32::new(customization.quantity).ok_or(PricingError::ZeroQuantity)?;
        let unit_price = self.unit_price(
            product,
            customization.size.as_deref(),
            &customization.toppings,
        )?;

        Ok(CartLine {
            product: product.clone(),
            size: customization.size.clone(),
            crust: customization.crust.clone(),
            toppings: customization.toppings.clone(),
            quantity,
            unit_price_override: Some(unit_price),
        })
    }
}

/// The choices a customer makes in the customizer dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customization {
    pub size: Option<String>,
    pub crust: Option<String>,
    pub toppings: BTreeSet<String>,
    pub quantity: u32,
}

impl Customization {
    /// First size, first crust, no toppings, one unit.
    pub fn defaults_for(engine: &PricingEngine, product: &Product) -> Self {
        Self {
            size: engine.sizes_for(product).first().map(|s| s.name.clone()),
            crust: engine.crusts_for(product).first().cloned(),
            toppings: BTreeSet::new(),
            quantity: 1,
        }
    }

    /// Adds the topping if missing, removes it if present.
    pub fn toggle_topping(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.toppings.remove(&name) {
            self.toppings.insert(name);
        }
    }
}
