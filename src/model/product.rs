//! A menu item offered by the restaurant.
//!
//! Products are reference data: the core reads them from a
//! [`ProductCatalog`](crate::catalog::ProductCatalog) and never mutates them.
//!
//! The option lists are optional. When a product does not define its own
//! sizes or toppings, the pricing engine falls back to the house defaults in
//! [`crate::pricing`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Menu section a product is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Traditional,
    Gourmet,
    Drinks,
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Traditional => "Traditional",
            Category::Gourmet => "Gourmet",
            Category::Drinks => "Drinks",
        };
        f.write_str(name)
    }
}

/// A size option and the factor it applies to the base price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeOption {
    pub name: String,
    pub multiplier: Decimal,
}

impl SizeOption {
    pub fn new(name: impl Into<String>, multiplier: Decimal) -> Self {
        Self {
            name: name.into(),
            multiplier,
        }
    }
}

/// An extra topping and its flat price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToppingOption {
    pub name: String,
    pub price: Decimal,
}

impl ToppingOption {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price of the smallest size with no extras.
    #[serde(rename = "price")]
    pub base_price: Decimal,
    pub category: Category,
    /// Emoji or short glyph shown next to the name.
    #[serde(default, rename = "image")]
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizes: Option<Vec<SizeOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crusts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toppings: Option<Vec<ToppingOption>>,
}

impl Product {
    /// Creates a product with no custom option lists.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        base_price: Decimal,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            base_price,
            category,
            icon: String::new(),
            sizes: None,
            crusts: None,
            toppings: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_sizes(mut self, sizes: Vec<SizeOption>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn with_crusts(mut self, crusts: Vec<String>) -> Self {
        self.crusts = Some(crusts);
        self
    }

    pub fn with_toppings(mut self, toppings: Vec<ToppingOption>) -> Self {
        self.toppings = Some(toppings);
        self
    }

    /// Drinks are sold as-is; everything else goes through the customizer.
    pub fn is_customizable(&self) -> bool {
        self.category != Category::Drinks
    }
}
