//! # Order Edit Commands
//!
//! Editing a placed order reuses the ticket rules (merge, frozen prices,
//! remove at zero) on a separate `OrderEdit`, then reports whether money is
//! owed either way.
//!
//! ```text
//! begin_edit(snapshot) ──► edit_add / edit_update_quantity / edit_remove_line
//!                                   │
//!                                   ▼
//!                             edit_delta ──► NoChange | RefundDue | AdditionalPaymentDue
//!                                   │
//!                                   ▼
//!                             submit_edit (submit.rs)
//! ```

use serde::Serialize;
use tableside_core::{EditDelta, Money, OrderEdit, OrderSnapshot, Selection, Ticket};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::ApiError;
use crate::state::EditState;

/// The edit in progress and its current reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub order_no: String,
    pub original_total: Money,
    pub ticket: Ticket,
    pub delta: EditDelta,
}

impl From<&OrderEdit> for EditResponse {
    fn from(edit: &OrderEdit) -> Self {
        EditResponse {
            order_no: edit.order_no().to_string(),
            original_total: edit.original_total(),
            ticket: edit.ticket().clone(),
            delta: edit.delta(),
        }
    }
}

/// Starts editing a placed order. Replaces any edit already in progress;
/// a rejected snapshot leaves the current edit in place.
pub fn begin_edit(edits: &EditState, snapshot: OrderSnapshot) -> Result<EditResponse, ApiError> {
    debug!(
        order_no = %snapshot.order_no,
        lines = snapshot.line_items.len(),
        "begin_edit command"
    );
    let edit = OrderEdit::begin(&snapshot)?;
    if edits.is_active() {
        info!(order_no = %snapshot.order_no, "Discarding unsubmitted edit");
    }
    let edit = edits.start(edit);
    Ok(EditResponse::from(&edit))
}

/// Adds a selection to the order being edited.
pub fn edit_add<C: Catalog>(
    catalog: &C,
    edits: &EditState,
    selection: Selection,
) -> Result<EditResponse, ApiError> {
    debug!(product_id = %selection.product_id, "edit_add command");

    let product = catalog.require(&selection.product_id)?;
    let edit = edits.apply(|e| e.apply(|t| t.add_selection(product, &selection)))?;
    Ok(EditResponse::from(&edit))
}

/// Adjusts a line of the order being edited by `delta`.
pub fn edit_update_quantity(
    edits: &EditState,
    line_id: &str,
    delta: i64,
) -> Result<EditResponse, ApiError> {
    debug!(line_id, delta, "edit_update_quantity command");

    let edit = edits.apply(|e| e.apply(|t| t.update_quantity(line_id, delta)))?;
    Ok(EditResponse::from(&edit))
}

/// Removes a line from the order being edited.
pub fn edit_remove_line(edits: &EditState, line_id: &str) -> Result<EditResponse, ApiError> {
    debug!(line_id, "edit_remove_line command");

    let edit = edits.apply(|e| e.apply(|t| t.remove_line(line_id)))?;
    Ok(EditResponse::from(&edit))
}

/// Current settlement for the order being edited.
pub fn edit_delta(edits: &EditState) -> Result<EditDelta, ApiError> {
    debug!("edit_delta command");
    Ok(edits.current()?.delta())
}

/// Abandons the edit without submitting.
pub fn cancel_edit(edits: &EditState) -> Result<(), ApiError> {
    debug!("cancel_edit command");
    edits.take()?;
    Ok(())
}
