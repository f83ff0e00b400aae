//! # tableside-core: Order Composition & Reconciliation
//!
//! Pure business logic for the front-of-house till. Every operation takes a
//! value and returns a new value; nothing here touches the network, disk,
//! or a clock-driven background task.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Tableside Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard UI (external)                      │   │
//! │  │     Menu ──► Item Modal ──► Cart Panel ──► Checkout / Edit      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/till (commands)                         │   │
//! │  │    add_selection, update_quantity, open_ticket, submit, ...     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tableside-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  pricing ──► ticket (merge) ──► session ──► reconcile           │   │
//! │  │  discount     money     validation     types     error          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO BACKEND • PURE STATE-IN / STATE-OUT               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog and order types (Product, Selection, OrderDetails)
//! - [`money`] - Money type with integer arithmetic, tax rate
//! - [`pricing`] - Unit price and configuration label resolution
//! - [`discount`] - Promotional price overlay for the inventory side
//! - [`ticket`] - Line items and the merge rule
//! - [`session`] - Up to two concurrent tickets per till session
//! - [`reconcile`] - Edited-order payment delta
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tableside_core::{Money, Product, Selection, Session, TaxRate, compute_totals};
//!
//! let pizza = Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500));
//! let session = Session::new();
//! let session = session
//!     .update_active_ticket(|t| t.add_selection(&pizza, &Selection::new("p-1")))
//!     .unwrap();
//!
//! let totals = compute_totals(session.active_ticket(), TaxRate::from_bps(1000));
//! assert_eq!(totals.subtotal.cents(), 2500);
//! assert_eq!(totals.total.cents(), 2750);
//! ```

pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod reconcile;
pub mod session;
pub mod ticket;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use discount::{apply_discount, equivalent_percentage, DiscountKind, DiscountSpec};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use pricing::{configuration_label, resolve_line_total, resolve_unit_price};
pub use reconcile::{reconcile, EditDelta, OrderEdit, OrderSnapshot, Settlement};
pub use session::{compute_totals, Session, Totals};
pub use ticket::{LineItem, Ticket};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of tickets open at once in a till session.
pub const MAX_OPEN_TICKETS: usize = 2;

/// Maximum distinct lines on one ticket.
///
/// ## Business Reason
/// Prevents runaway tickets from a stuck "add" button.
pub const MAX_TICKET_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches fat-finger entries (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum catalog price (base, variant or add-on), in minor units.
///
/// ## Business Reason
/// Keeps a worst-case ticket (every line at the caps) well inside i64.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;

/// Configuration label used when a selection has no variant and no add-ons.
pub const REGULAR_LABEL: &str = "REGULAR";
