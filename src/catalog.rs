//! Menu providers.
//!
//! The core only ever reads the menu. [`BuiltinCatalog`] is the house menu,
//! [`JsonFileCatalog`] reads a `products.json`, and [`FallbackCatalog`] uses the
//! first one that yields anything.

use std::fmt::Debug;
use std::path::PathBuf;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::model::{Category, Product, ProductId};

/// Read-only source of the menu.
pub trait ProductCatalog: Send + Sync + Debug {
    fn products(&self) -> Vec<Product>;

    fn find(&self, id: &ProductId) -> Option<Product> {
        self.products().into_iter().find(|product| &product.id == id)
    }
}

/// The eleven-item house menu.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCatalog;

impl ProductCatalog for BuiltinCatalog {
    fn products(&self) -> Vec<Product> {
        use Category::*;

        [
            ("1", "Pizza Margherita", "Salsa de tomate, mozzarella fresca, albahaca", 120, Traditional, "🍕"),
            ("2", "Pizza Pepperoni", "Salsa de tomate, mozzarella, pepperoni", 140, Traditional, "🍕"),
            ("3", "Pizza Hawaiana", "Salsa de tomate, mozzarella, jamón, piña", 150, Traditional, "🍕"),
            ("4", "Pizza Mexicana", "Salsa de tomate, mozzarella, jalapeños, chorizo, cebolla", 160, Traditional, "🍕"),
            ("5", "Pizza Cuatro Quesos", "Mozzarella, parmesano, gorgonzola, queso de cabra", 180, Gourmet, "🧀"),
            ("6", "Pizza Prosciutto", "Salsa blanca, mozzarella, prosciutto, rúcula, tomate cherry", 220, Gourmet, "🥓"),
            ("7", "Pizza Trufa", "Salsa blanca, mozzarella, champiñones, aceite de trufa", 250, Gourmet, "🍄"),
            ("8", "Pizza BBQ", "Salsa BBQ, mozzarella, pollo, cebolla morada, cilantro", 190, Gourmet, "🍖"),
            ("9", "Coca Cola", "Refresco de cola 355ml", 25, Drinks, "🥤"),
            ("10", "Agua Natural", "Agua purificada 500ml", 15, Drinks, "💧"),
            ("11", "Jugo de Naranja", "Jugo natural de naranja 300ml", 30, Drinks, "🍊"),
        ]
        .into_iter()
        .map(|(id, name, description, price, category, icon)| {
            Product::new(id, name, Decimal::from(price), category)
                .with_description(description)
                .with_icon(icon)
        })
        .collect()
    }
}

/// A JSON array of products on disk.
///
/// A missing or malformed file reads as an empty menu.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProductCatalog for JsonFileCatalog {
    fn products(&self) -> Vec<Product> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Catalog file not readable");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(products) => products,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Catalog file malformed");
                Vec::new()
            }
        }
    }
}

/// `primary`, unless it comes back empty.
#[derive(Debug)]
pub struct FallbackCatalog<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> FallbackCatalog<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ProductCatalog, F: ProductCatalog> ProductCatalog for FallbackCatalog<P, F> {
    fn products(&self) -> Vec<Product> {
        let products = self.primary.products();
        if products.is_empty() {
            debug!("Primary catalog empty, using fallback");
            self.fallback.products()
        } else {
            products
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_menu() {
        let products = BuiltinCatalog.products();
        assert_eq!(products.len(), 11);
        assert_eq!(products.iter().filter(|p| p.category == Category::Drinks).count(), 3);

        let margherita = BuiltinCatalog.find(&ProductId::from("1")).unwrap();
        assert_eq!(margherita.base_price, Decimal::from(120));
        assert!(BuiltinCatalog.find(&ProductId::from("99")).is_none());
    }

    #[test]
    fn test_json_file_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id": "p1", "name": "Pizza Especial", "price": 199.5, "category": "Gourmet", "image": "🍕"}]"#,
        )
        .unwrap();

        let products = JsonFileCatalog::new(&path).products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].base_price, Decimal::new(1995, 1));
        assert_eq!(products[0].icon, "🍕");
    }

    #[test]
    fn test_bad_catalog_files_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonFileCatalog::new(dir.path().join("absent.json")).products().is_empty());

        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileCatalog::new(&path).products().is_empty());
    }

    #[test]
    fn test_fallback_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FallbackCatalog::new(JsonFileCatalog::new(dir.path().join("absent.json")), BuiltinCatalog);
        assert_eq!(catalog.products().len(), 11);
    }
}
