//! # Order Edit Reconciliation
//!
//! When a placed order is edited, the new total is compared against the
//! total the customer already paid.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderSnapshot (from orders service)                                    │
//! │    order_no, original_total = 5230, line items                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  OrderEdit::begin ──► Ticket built from the snapshot lines              │
//! │         │                                                               │
//! │         ▼  add_selection / update_quantity / remove_line                │
//! │  OrderEdit::delta() ──► reconcile(5230, edited lines)                   │
//! │                                                                         │
//! │    recomputed 5230 → NoChange                                           │
//! │    recomputed 4000 → RefundDue(1230)                                    │
//! │    recomputed 6500 → AdditionalPaymentDue(1270)                         │
//! │    no lines left   → RefundDue(5230)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The delta is derived on demand and never stored. Persisting the edit and
//! settling the money belong to the till's collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::ticket::{LineItem, Ticket};
use crate::types::OrderDetails;
use crate::validation::validate_line_item;

// =============================================================================
// Edit Delta
// =============================================================================

/// What the operator must do after an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum Settlement {
    NoChange,
    /// Money owed back to the customer (positive magnitude).
    RefundDue(Money),
    /// Money still to collect (positive magnitude).
    AdditionalPaymentDue(Money),
}

/// Signed difference between an edited order and what was originally paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct EditDelta {
    pub original_total: Money,
    pub recomputed_total: Money,
    /// recomputed − original
    pub signed_delta: Money,
    pub settlement: Settlement,
}

/// Compares an edited line set against the original total.
///
/// Comparison is on integer minor units, so zero means exactly zero.
///
/// ## Example
/// ```rust
/// use tableside_core::{reconcile, Money, Settlement};
///
/// let delta = reconcile(Money::from_cents(5230), &[]);
/// assert_eq!(delta.settlement, Settlement::RefundDue(Money::from_cents(5230)));
/// ```
pub fn reconcile(original_total: Money, edited_items: &[LineItem]) -> EditDelta {
    let recomputed_total: Money = edited_items.iter().map(LineItem::line_total).sum();
    let signed_delta = recomputed_total - original_total;

    let settlement = if signed_delta.is_zero() {
        Settlement::NoChange
    } else if signed_delta.is_negative() {
        Settlement::RefundDue(-signed_delta)
    } else {
        Settlement::AdditionalPaymentDue(signed_delta)
    };

    EditDelta {
        original_total,
        recomputed_total,
        signed_delta,
        settlement,
    }
}

// =============================================================================
// Edit Flow
// =============================================================================

/// A placed order as the orders service hands it back for editing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSnapshot {
    pub order_no: String,
    pub original_total: Money,
    pub line_items: Vec<LineItem>,
    #[serde(default)]
    pub details: Option<OrderDetails>,
    #[ts(as = "String")]
    pub placed_at: DateTime<Utc>,
}

/// An order being edited. Structurally just another ticket, plus the frozen
/// original total it is reconciled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderEdit {
    order_no: String,
    original_total: Money,
    ticket: Ticket,
}

impl OrderEdit {
    /// Starts an edit from a snapshot. Lines keep their quoted unit prices;
    /// zero-quantity lines in the snapshot are dropped.
    ///
    /// ## Errors
    /// - `Validation` if the original total is negative, or a remaining line
    ///   carries a quantity or unit price outside the ticket bounds
    pub fn begin(snapshot: &OrderSnapshot) -> CoreResult<Self> {
        if snapshot.original_total.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "original total".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        let mut ticket = Ticket::with_id(snapshot.order_no.clone());
        ticket.items = snapshot
            .line_items
            .iter()
            .filter(|l| l.quantity != 0)
            .map(|l| validate_line_item(l).map(|_| l.clone()))
            .collect::<Result<_, _>>()?;
        ticket.details = snapshot.details.clone();

        Ok(OrderEdit {
            order_no: snapshot.order_no.clone(),
            original_total: snapshot.original_total,
            ticket,
        })
    }

    pub fn order_no(&self) -> &str {
        &self.order_no
    }

    pub fn original_total(&self) -> Money {
        self.original_total
    }

    pub fn ticket(&self) -> &Ticket {
        &self.ticket
    }

    /// Applies a ticket transform to the edited lines.
    pub fn apply<F>(&self, f: F) -> CoreResult<OrderEdit>
    where
        F: FnOnce(&Ticket) -> CoreResult<Ticket>,
    {
        Ok(OrderEdit {
            ticket: f(&self.ticket)?,
            ..self.clone()
        })
    }

    /// Current reconciliation against the original total.
    pub fn delta(&self) -> EditDelta {
        reconcile(self.original_total, &self.ticket.items)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
