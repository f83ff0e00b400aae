//! # Ticket Commands
//!
//! Line item manipulation on the active ticket.
//!
//! ## Ticket Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐        │
//! │  │  Empty   │────►│  Lines   │────►│ Details  │────►│ Submitted│        │
//! │  │  Ticket  │     │          │     │  + Notes │     │ (cleared)│        │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘        │
//! │                        │                                  │             │
//! │                   add_selection                 submit_active_ticket    │
//! │                   update_quantity                   (submit.rs)         │
//! │                   remove_line                                           │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                   clear_ticket ──────────────────► (back to empty)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tableside_core::{OrderDetails, Selection, Session, Totals};
use tracing::debug;

use super::SessionResponse;
use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::state::{SessionState, TillConfig};

/// Gets the current session contents.
pub fn get_session(session: &SessionState, config: &TillConfig) -> SessionResponse {
    debug!("get_session command");
    session.with_session(|s| SessionResponse::new(s, config.tax_rate()))
}

/// Adds a configured product to the active ticket.
///
/// ## Behavior
/// - Same product and configuration already on the ticket: quantity grows,
///   the line keeps the unit price it was created with
/// - Otherwise: a new line priced from the current menu
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Item modal: Margherita Pizza                                           │
/// │    Size:    (•) Large  42.50                                            │
/// │    Extras:  Extra Cheese  [-] 2 [+]                                     │
/// │    Qty:     1                                                           │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  add_selection { productId: 'p-1', variant: 'Large',                    │
/// │                  addOns: { 'a-1': 2 }, quantity: 1 }                    │
/// │                    │                                                    │
/// │                    ▼                                                    │
/// │  Line: Margherita Pizza  "Large + Extra Cheese x2"  47.30 × 1           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn add_selection<C: Catalog>(
    catalog: &C,
    session: &SessionState,
    config: &TillConfig,
    selection: Selection,
) -> Result<SessionResponse, ApiError> {
    debug!(
        product_id = %selection.product_id,
        variant = ?selection.variant,
        quantity = selection.quantity,
        "add_selection command"
    );

    let product = catalog.require(&selection.product_id)?;
    let next = session.apply(|s| s.update_active_ticket(|t| t.add_selection(product, &selection)))?;
    Ok(SessionResponse::new(&next, config.tax_rate()))
}

/// Adjusts a line's quantity on the active ticket by `delta` (+1 / -1 from
/// the stepper). Reaching zero removes the line.
pub fn update_quantity(
    session: &SessionState,
    config: &TillConfig,
    line_id: &str,
    delta: i64,
) -> Result<SessionResponse, ApiError> {
    debug!(line_id, delta, "update_quantity command");

    let next = session.apply(|s| s.update_active_ticket(|t| t.update_quantity(line_id, delta)))?;
    Ok(SessionResponse::new(&next, config.tax_rate()))
}

/// Removes a line from the active ticket.
pub fn remove_line(
    session: &SessionState,
    config: &TillConfig,
    line_id: &str,
) -> Result<SessionResponse, ApiError> {
    debug!(line_id, "remove_line command");

    let next = session.apply(|s| s.update_active_ticket(|t| t.remove_line(line_id)))?;
    Ok(SessionResponse::new(&next, config.tax_rate()))
}

/// Empties the active ticket. The ticket stays open.
pub fn clear_ticket(session: &SessionState, config: &TillConfig) -> SessionResponse {
    debug!("clear_ticket command");

    let next = session.replace(clear_active);
    SessionResponse::new(&next, config.tax_rate())
}

fn clear_active(session: &Session) -> Session {
    session
        .update_active_ticket(|t| Ok(t.clear()))
        .unwrap_or_else(|_| session.clone())
}

/// Attaches customer and fulfillment details to the active ticket.
pub fn set_order_details(
    session: &SessionState,
    config: &TillConfig,
    details: OrderDetails,
) -> Result<SessionResponse, ApiError> {
    debug!(fulfillment = details.fulfillment.label(), "set_order_details command");

    let next = session.apply(|s| s.update_active_ticket(|t| t.set_details(details)))?;
    Ok(SessionResponse::new(&next, config.tax_rate()))
}

/// Sets the kitchen and/or order note on the active ticket. `None` leaves a
/// note unchanged.
pub fn set_notes(
    session: &SessionState,
    config: &TillConfig,
    kitchen_note: Option<String>,
    order_note: Option<String>,
) -> Result<SessionResponse, ApiError> {
    debug!(
        kitchen = kitchen_note.is_some(),
        order = order_note.is_some(),
        "set_notes command"
    );

    let next = session.apply(|s| {
        s.update_active_ticket(|t| {
            let mut next = t.clone();
            if let Some(note) = kitchen_note {
                next = next.set_kitchen_note(note);
            }
            if let Some(note) = order_note {
                next = next.set_order_note(note);
            }
            Ok(next)
        })
    })?;
    Ok(SessionResponse::new(&next, config.tax_rate()))
}

/// Totals of the active ticket.
pub fn get_totals(session: &SessionState, config: &TillConfig) -> Totals {
    debug!("get_totals command");
    get_session(session, config).totals
}
