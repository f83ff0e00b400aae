//! # Menu Catalog
//!
//! Read-only product lookup. The till never edits the menu; it only resolves
//! the product a cashier tapped so the core can price it.
//!
//! ## Menu File Format
//! ```json
//! [
//!   {
//!     "id": "p-1",
//!     "name": "Margherita Pizza",
//!     "category": "Pizza",
//!     "basePrice": 2500,
//!     "variants": [{ "name": "Large", "price": 4250 }],
//!     "addOns": [{ "id": "a-1", "name": "Extra Cheese", "price": 240 }]
//!   }
//! ]
//! ```

use std::collections::HashMap;
use std::path::Path;

use tableside_core::validation::validate_product;
use tableside_core::Product;
use tracing::{info, warn};

use crate::error::{TillError, TillResult};

/// Product lookup used by the commands.
pub trait Catalog {
    fn product(&self, id: &str) -> Option<&Product>;

    fn products(&self) -> &[Product];

    /// Like `product`, but a missing id is an error.
    fn require(&self, id: &str) -> TillResult<&Product> {
        self.product(id)
            .ok_or_else(|| TillError::ProductNotFound(id.to_string()))
    }
}

/// In-memory catalog, indexed by product id.
#[derive(Debug, Clone, Default)]
pub struct MenuCatalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
}

impl MenuCatalog {
    /// Builds the catalog.
    ///
    /// ## Skipped Entries
    /// - A product with a price outside the allowed range is dropped
    /// - A repeated id keeps the first entry
    pub fn new(products: Vec<Product>) -> Self {
        let products: Vec<Product> = products
            .into_iter()
            .filter(|product| match validate_product(product) {
                Ok(()) => true,
                Err(e) => {
                    warn!(product_id = %product.id, error = %e, "Invalid product in menu, skipping");
                    false
                }
            })
            .collect();

        let mut index = HashMap::with_capacity(products.len());
        for (pos, product) in products.iter().enumerate() {
            if index.contains_key(&product.id) {
                warn!(product_id = %product.id, "Duplicate product id in menu, keeping first");
                continue;
            }
            index.insert(product.id.clone(), pos);
        }
        MenuCatalog { products, index }
    }

    pub fn from_json_str(json: &str) -> TillResult<Self> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Ok(Self::new(products))
    }

    /// Loads the menu from a JSON file.
    pub fn load(path: &Path) -> TillResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&contents)?;
        info!(?path, products = catalog.products.len(), "Menu catalog loaded");
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl Catalog for MenuCatalog {
    fn product(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&pos| &self.products[pos])
    }

    fn products(&self) -> &[Product] {
        &self.products
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tableside_core::Money;

    const MENU: &str = r#"[
        {
            "id": "p-1",
            "name": "Margherita Pizza",
            "category": "Pizza",
            "basePrice": 2500,
            "variants": [{ "name": "Large", "price": 4250 }],
            "addOns": [{ "id": "a-1", "name": "Extra Cheese", "price": 240 }]
        },
        {
            "id": "p-2",
            "name": "Lemonade",
            "category": "Drinks",
            "basePrice": 450
        }
    ]"#;

    #[test]
    fn test_from_json() {
        let catalog = MenuCatalog::from_json_str(MENU).unwrap();
        assert_eq!(catalog.len(), 2);

        let pizza = catalog.product("p-1").unwrap();
        assert_eq!(pizza.variant("Large").unwrap().price, Money::from_cents(4250));
        assert_eq!(pizza.add_on("a-1").unwrap().name, "Extra Cheese");

        let lemonade = catalog.product("p-2").unwrap();
        assert!(lemonade.variants.is_empty());
        assert!(lemonade.add_ons.is_empty());
    }

    #[test]
    fn test_require_unknown_product() {
        let catalog = MenuCatalog::from_json_str(MENU).unwrap();
        assert!(catalog.product("p-404").is_none());
        assert!(matches!(
            catalog.require("p-404"),
            Err(TillError::ProductNotFound(id)) if id == "p-404"
        ));
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = MenuCatalog::new(vec![
            Product::new("p-1", "Soup", "Starters", Money::from_cents(600)),
            Product::new("p-1", "Soup (old)", "Starters", Money::from_cents(500)),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.product("p-1").unwrap().name, "Soup");
    }

    #[test]
    fn test_negative_prices_are_skipped() {
        let json = r#"[
            { "id": "p-1", "name": "Soup", "category": "Starters", "basePrice": 600 },
            { "id": "p-2", "name": "Salad", "category": "Starters", "basePrice": -500 },
            {
                "id": "p-3",
                "name": "Fries",
                "category": "Sides",
                "basePrice": 300,
                "addOns": [{ "id": "a-1", "name": "Dip", "price": -50 }]
            },
            {
                "id": "p-4",
                "name": "Pasta",
                "category": "Mains",
                "basePrice": 1400,
                "variants": [{ "name": "Large", "price": -1 }]
            }
        ]"#;
        let catalog = MenuCatalog::from_json_str(json).unwrap();

        assert_eq!(catalog.len(), 1);
        assert!(catalog.product("p-1").is_some());
        assert!(catalog.product("p-2").is_none());
        assert!(catalog.product("p-3").is_none());
        assert!(catalog.product("p-4").is_none());
        assert_eq!(catalog.products().len(), 1);
    }

    #[test]
    fn test_skipped_duplicate_does_not_shadow_valid_entry() {
        let catalog = MenuCatalog::new(vec![
            Product::new("p-1", "Soup (bad)", "Starters", Money::from_cents(-1)),
            Product::new("p-1", "Soup", "Starters", Money::from_cents(600)),
        ]);
        assert_eq!(catalog.product("p-1").unwrap().name, "Soup");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MENU.as_bytes()).unwrap();

        let catalog = MenuCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.products().len(), 2);
    }

    #[test]
    fn test_malformed_menu() {
        assert!(matches!(
            MenuCatalog::from_json_str("{ not json"),
            Err(TillError::CatalogParse(_))
        ));
    }
}
