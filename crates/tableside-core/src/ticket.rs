//! # Tickets & the Merge Rule
//!
//! A ticket is one in-progress customer order. Its lines are keyed by
//! configuration signature, not object identity: adding "Margherita Pizza /
//! Large + Olives x2" twice yields one line with quantity 2.
//!
//! ## Ticket Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Ticket Operations                                    │
//! │                                                                         │
//! │  Cashier Action          Operation                 Result               │
//! │  ──────────────          ─────────                 ──────               │
//! │                                                                         │
//! │  "Add to order" ───────► add_selection() ───────► merge or append      │
//! │                                                                         │
//! │  Tap "+" / "-" ────────► update_quantity(±n) ───► qty 0 removes line   │
//! │                                                                         │
//! │  Swipe to delete ──────► remove_line() ─────────► line gone            │
//! │                                                                         │
//! │  Every operation returns a NEW Ticket; the receiver is never mutated.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Freezing
//! A line's unit price is computed once, when the line is created. Merging
//! more units into it never reprices, even if the catalog changed in the
//! meantime.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::pricing::{configuration_label, resolve_line_total, resolve_unit_price};
use crate::types::{OrderDetails, Product, Selection};
use crate::validation::{validate_order_details, validate_selection, validate_ticket_size};
use crate::{MAX_ITEM_QUANTITY, MAX_TICKET_LINES};

// =============================================================================
// Line Item
// =============================================================================

/// One priced, quantity-bearing row on a ticket.
///
/// ## Invariants
/// - `quantity >= 1`; a line that would reach 0 is removed instead
/// - `unit_price` is frozen at creation
/// - `(product_name, details)` is unique within a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Opaque, unique within the ticket.
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    /// Configuration label, e.g. "Large + Olives x2" or "REGULAR".
    pub details: String,
    pub unit_price: Money,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
}

impl LineItem {
    /// unit price × quantity
    pub fn line_total(&self) -> Money {
        resolve_line_total(self.unit_price, self.quantity)
    }

    /// True when this line is the merge target for the given signature.
    pub fn matches(&self, product_name: &str, details: &str) -> bool {
        self.product_name == product_name && self.details == details
    }
}

// =============================================================================
// Ticket
// =============================================================================

/// An in-progress order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    /// Insertion order; not significant to pricing.
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub details: Option<OrderDetails>,
    #[serde(default)]
    pub kitchen_note: String,
    #[serde(default)]
    pub order_note: String,
}

impl Ticket {
    /// Creates an empty ticket with a fresh id.
    pub fn new() -> Self {
        Ticket::with_id(Uuid::new_v4().to_string())
    }

    /// Creates an empty ticket with a given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Ticket {
            id: id.into(),
            items: Vec::new(),
            details: None,
            kitchen_note: String::new(),
            order_note: String::new(),
        }
    }

    /// Adds a selection, merging into an existing line with the same
    /// configuration or appending a new one.
    ///
    /// ## Behavior
    /// - Validates the selection against the product first
    /// - Match on `(product name, label)`: quantity grows, unit price stays
    /// - No match: new line priced now
    ///
    /// ## Errors
    /// - `Validation` for malformed selections
    /// - `QuantityTooLarge` if the merged quantity passes the cap
    /// - `TicketTooLarge` if a new line would pass the line cap
    pub fn add_selection(&self, product: &Product, selection: &Selection) -> CoreResult<Ticket> {
        validate_selection(product, selection)?;

        let variant = selection.variant.as_deref();
        let label = configuration_label(product, variant, &selection.add_ons);
        let mut next = self.clone();

        if let Some(line) = next
            .items
            .iter_mut()
            .find(|l| l.matches(&product.name, &label))
        {
            let new_qty = line.quantity + selection.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(next);
        }

        validate_ticket_size(next.items.len())
            .map_err(|_| CoreError::TicketTooLarge { max: MAX_TICKET_LINES })?;

        next.items.push(LineItem {
            id: Uuid::new_v4().to_string(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            details: label,
            unit_price: resolve_unit_price(product, variant, &selection.add_ons),
            quantity: selection.quantity,
            image: product.image.clone(),
        });
        Ok(next)
    }

    /// Adjusts a line's quantity by `delta`.
    ///
    /// The new quantity is `max(0, old + delta)`; reaching 0 removes the line.
    /// A delta past the i64 range saturates and is refused by the cap.
    pub fn update_quantity(&self, line_id: &str, delta: i64) -> CoreResult<Ticket> {
        let idx = self.line_index(line_id)?;
        let new_qty = self.items[idx].quantity.saturating_add(delta).max(0);

        if new_qty > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: new_qty,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let mut next = self.clone();
        if new_qty == 0 {
            next.items.remove(idx);
        } else {
            next.items[idx].quantity = new_qty;
        }
        Ok(next)
    }

    /// Removes a line regardless of its quantity.
    pub fn remove_line(&self, line_id: &str) -> CoreResult<Ticket> {
        let idx = self.line_index(line_id)?;
        let mut next = self.clone();
        next.items.remove(idx);
        Ok(next)
    }

    /// Attaches validated customer/fulfillment details.
    pub fn set_details(&self, details: OrderDetails) -> CoreResult<Ticket> {
        validate_order_details(&details)?;
        Ok(Ticket {
            details: Some(details),
            ..self.clone()
        })
    }

    pub fn set_kitchen_note(&self, note: impl Into<String>) -> Ticket {
        Ticket {
            kitchen_note: note.into(),
            ..self.clone()
        }
    }

    pub fn set_order_note(&self, note: impl Into<String>) -> Ticket {
        Ticket {
            order_note: note.into(),
            ..self.clone()
        }
    }

    /// Empties the ticket, keeping its id.
    pub fn clear(&self) -> Ticket {
        Ticket::with_id(self.id.clone())
    }

    /// Finds a line by id.
    pub fn line(&self, line_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|l| l.id == line_id)
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }

    /// Σ unit price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn line_index(&self, line_id: &str) -> CoreResult<usize> {
        self.items
            .iter()
            .position(|l| l.id == line_id)
            .ok_or_else(|| CoreError::LineItemNotFound(line_id.to_string()))
    }
}

impl Default for Ticket {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
