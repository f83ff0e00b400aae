//! # Till Session
//!
//! The running till state: one or two open tickets and a pointer to the one
//! the cashier is working on.
//!
//! ## Ticket Bounds
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   1 ticket ──open_ticket()──► 2 tickets ──open_ticket()──► 2 (refused)  │
//! │      ▲                            │                                     │
//! │      └──────close_ticket()────────┘                                     │
//! │                                                                         │
//! │   1 ticket ──close_ticket()──► 1 (refused)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Refusals return the session unchanged. The UI disables those buttons, but
//! the session enforces the bounds regardless.
//!
//! Every method takes `&self` and returns a new `Session`, so a reader holding
//! the previous value never sees a half-applied change.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, TaxRate};
use crate::ticket::Ticket;
use crate::MAX_OPEN_TICKETS;

// =============================================================================
// Session
// =============================================================================

/// Till session state.
///
/// ## Invariants
/// - `1 <= tickets.len() <= MAX_OPEN_TICKETS`
/// - `active_ticket()` always resolves (stale pointer falls back to the first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    tickets: Vec<Ticket>,
    active_ticket_id: String,
}

impl Session {
    /// Opens a session with one empty, active ticket.
    pub fn new() -> Self {
        let ticket = Ticket::new();
        Session {
            active_ticket_id: ticket.id.clone(),
            tickets: vec![ticket],
        }
    }

    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    pub fn active_ticket_id(&self) -> &str {
        &self.active_ticket_id
    }

    pub fn ticket(&self, ticket_id: &str) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == ticket_id)
    }

    /// The ticket being worked on. Never fails.
    pub fn active_ticket(&self) -> &Ticket {
        self.ticket(&self.active_ticket_id)
            .unwrap_or(&self.tickets[0])
    }

    /// Opens a new ticket and makes it active. Refused at the limit.
    pub fn open_ticket(&self) -> Session {
        if self.tickets.len() >= MAX_OPEN_TICKETS {
            debug!(open = self.tickets.len(), "open_ticket refused: limit reached");
            return self.clone();
        }

        let ticket = Ticket::new();
        let mut next = self.clone();
        next.active_ticket_id = ticket.id.clone();
        next.tickets.push(ticket);
        next
    }

    /// Closes a ticket. Refused for the last ticket; unknown ids are a no-op.
    ///
    /// Closing the active ticket moves activity to the first remaining one.
    pub fn close_ticket(&self, ticket_id: &str) -> Session {
        if self.tickets.len() <= 1 {
            debug!(ticket_id, "close_ticket refused: last ticket");
            return self.clone();
        }

        let mut next = self.clone();
        next.tickets.retain(|t| t.id != ticket_id);
        if next.tickets.len() == self.tickets.len() {
            debug!(ticket_id, "close_ticket ignored: unknown ticket");
            return next;
        }

        if next.active_ticket_id == ticket_id {
            next.active_ticket_id = next.tickets[0].id.clone();
        }
        next
    }

    /// Points the session at another ticket. Unknown ids are a no-op.
    pub fn set_active_ticket(&self, ticket_id: &str) -> Session {
        if self.ticket(ticket_id).is_none() {
            debug!(ticket_id, "set_active_ticket ignored: unknown ticket");
            return self.clone();
        }

        Session {
            tickets: self.tickets.clone(),
            active_ticket_id: ticket_id.to_string(),
        }
    }

    /// Applies a ticket transform to one ticket.
    ///
    /// ## Usage
    /// ```rust
    /// use tableside_core::{Money, Product, Selection, Session};
    ///
    /// let soda = Product::new("p-2", "Lime Soda", "Drinks", Money::from_cents(150));
    /// let session = Session::new();
    /// let id = session.active_ticket_id().to_string();
    /// let session = session
    ///     .update_ticket(&id, |t| t.add_selection(&soda, &Selection::new("p-2")))
    ///     .unwrap();
    /// assert_eq!(session.active_ticket().item_count(), 1);
    /// ```
    pub fn update_ticket<F>(&self, ticket_id: &str, f: F) -> CoreResult<Session>
    where
        F: FnOnce(&Ticket) -> CoreResult<Ticket>,
    {
        let idx = self
            .tickets
            .iter()
            .position(|t| t.id == ticket_id)
            .ok_or_else(|| CoreError::TicketNotFound(ticket_id.to_string()))?;

        let updated = f(&self.tickets[idx])?;
        let mut next = self.clone();
        next.tickets[idx] = Ticket {
            id: self.tickets[idx].id.clone(),
            ..updated
        };
        Ok(next)
    }

    /// Applies a ticket transform to the active ticket.
    pub fn update_active_ticket<F>(&self, f: F) -> CoreResult<Session>
    where
        F: FnOnce(&Ticket) -> CoreResult<Ticket>,
    {
        let id = self.active_ticket().id.clone();
        self.update_ticket(&id, f)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Ticket totals, recomputed from the lines on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// subtotal = Σ unit × qty; tax = subtotal × rate; total = subtotal + tax.
///
/// ## Example
/// ```rust
/// use tableside_core::{compute_totals, Money, Product, Selection, TaxRate, Ticket};
///
/// let pizza = Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500));
/// let ticket = Ticket::new()
///     .add_selection(&pizza, &Selection::new("p-1").with_quantity(2))
///     .unwrap();
///
/// let totals = compute_totals(&ticket, TaxRate::from_bps(500));
/// assert_eq!(totals.subtotal.cents(), 5000);
/// assert_eq!(totals.tax.cents(), 250);
/// assert_eq!(totals.total.cents(), 5250);
/// ```
pub fn compute_totals(ticket: &Ticket, tax_rate: TaxRate) -> Totals {
    let subtotal = ticket.subtotal();
    let tax = subtotal.calculate_tax(tax_rate);
    Totals {
        item_count: ticket.item_count(),
        total_quantity: ticket.total_quantity(),
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
