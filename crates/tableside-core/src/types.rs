//! # Domain Types
//!
//! Catalog entities (read-only for a session) and the transient selection a
//! cashier builds in the item modal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Selection    │   │  OrderDetails   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id, name       │   │  product_id     │   │  customer_name  │       │
//! │  │  category       │   │  variant?       │   │  phone          │       │
//! │  │  base_price     │   │  add_ons{id:n}  │   │  fulfillment    │       │
//! │  │  variants[]     │   │  quantity       │   └────────┬────────┘       │
//! │  │  add_ons[]      │   └─────────────────┘            │                │
//! │  └─────────────────┘                        ┌─────────▼────────┐       │
//! │                                             │   Fulfillment    │       │
//! │                                             │  DineIn{table}   │       │
//! │                                             │  TakeAway        │       │
//! │                                             │  Delivery{addr}  │       │
//! │                                             └──────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A priced size or style of a product ("Large", "Half").
///
/// The variant price replaces the base price; it is not added to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub name: String,
    pub price: Money,
}

/// An optional extra that can be ordered in any quantity ("Olives x2").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AddOn {
    pub id: String,
    pub name: String,
    pub price: Money,
}

/// A menu item, as supplied by the menu service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub base_price: Money,
    /// Ordered as the menu service lists them.
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Creates a product with no variants or add-ons.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        base_price: Money,
    ) -> Self {
        Product {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            base_price,
            variants: Vec::new(),
            add_ons: Vec::new(),
            image: None,
        }
    }

    /// Appends a variant.
    pub fn with_variant(mut self, name: impl Into<String>, price: Money) -> Self {
        self.variants.push(Variant {
            name: name.into(),
            price,
        });
        self
    }

    /// Appends an add-on.
    pub fn with_add_on(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
    ) -> Self {
        self.add_ons.push(AddOn {
            id: id.into(),
            name: name.into(),
            price,
        });
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Finds a variant by exact name.
    pub fn variant(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name == name)
    }

    /// Finds an add-on by id.
    pub fn add_on(&self, id: &str) -> Option<&AddOn> {
        self.add_ons.iter().find(|a| a.id == id)
    }
}

// =============================================================================
// Selection
// =============================================================================

/// What the cashier picked in the item modal, before it becomes a line.
///
/// Add-on entries always carry a quantity above zero: setting one to zero
/// drops the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub product_id: String,
    #[serde(default)]
    pub variant: Option<String>,
    /// addOnId → quantity
    #[serde(default)]
    pub add_ons: BTreeMap<String, i64>,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

impl Selection {
    /// A quick-add selection: no modifiers, quantity 1.
    pub fn new(product_id: impl Into<String>) -> Self {
        Selection {
            product_id: product_id.into(),
            variant: None,
            add_ons: BTreeMap::new(),
            quantity: default_quantity(),
        }
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_add_on(mut self, add_on_id: impl Into<String>, qty: i64) -> Self {
        self.set_add_on_quantity(add_on_id, qty);
        self
    }

    pub fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// Sets an add-on quantity, pruning the entry at zero or below.
    pub fn set_add_on_quantity(&mut self, add_on_id: impl Into<String>, qty: i64) {
        let add_on_id = add_on_id.into();
        if qty > 0 {
            self.add_ons.insert(add_on_id, qty);
        } else {
            self.add_ons.remove(&add_on_id);
        }
    }
}

// =============================================================================
// Order Details
// =============================================================================

/// How the order leaves the kitchen, with the fields each mode needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fulfillment {
    DineIn {
        table_number: String,
    },
    TakeAway,
    Delivery {
        address: String,
        #[serde(default)]
        landmark: Option<String>,
        zip_code: String,
        #[serde(default)]
        instructions: Option<String>,
    },
}

impl Fulfillment {
    /// Label used on tickets and receipts.
    pub fn label(&self) -> &'static str {
        match self {
            Fulfillment::DineIn { .. } => "Dine In",
            Fulfillment::TakeAway => "Take Away",
            Fulfillment::Delivery { .. } => "Delivery",
        }
    }
}

impl Default for Fulfillment {
    fn default() -> Self {
        Fulfillment::TakeAway
    }
}

/// Customer and fulfillment metadata attached to a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub customer_name: String,
    pub phone: String,
    pub fulfillment: Fulfillment,
}

// =============================================================================
// Unit Tests
// =============================================================================
