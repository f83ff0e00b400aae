//! # Submit Commands
//!
//! Hands finished work to the orders service. The session lock is never
//! held while the submitter is awaited: the ticket is snapshotted first and
//! only cleared once the service accepts it, and only if it still matches
//! what was sent.

use chrono::Utc;
use serde::Serialize;
use tableside_core::{compute_totals, EditDelta};
use tracing::{debug, info, warn};

use super::SessionResponse;
use crate::error::{ApiError, TillError};
use crate::state::{EditState, SessionState, TillConfig};
use crate::submit::{EditedOrder, FinalizedOrder, OrderSubmitter, SubmitReceipt};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub receipt: SubmitReceipt,
    pub session: SessionResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditSubmitResponse {
    pub receipt: SubmitReceipt,
    pub delta: EditDelta,
}

/// Submits the active ticket and empties it on success.
///
/// ## Flow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Snapshot active ticket + totals        (lock held briefly)          │
/// │  2. Reject empty ticket                                                 │
/// │  3. submitter.submit(order).await          (no lock)                    │
/// │  4. Ok  → clear the ticket if unchanged    (lock held briefly)          │
/// │     Err → nothing changes, error returned                              │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn submit_active_ticket<S: OrderSubmitter>(
    session: &SessionState,
    config: &TillConfig,
    submitter: &S,
) -> Result<SubmitResponse, ApiError> {
    let (submitted, order) = session.with_session(|s| {
        let ticket = s.active_ticket();
        (
            ticket.clone(),
            FinalizedOrder::new(ticket, compute_totals(ticket, config.tax_rate())),
        )
    });
    debug!(ticket_id = %order.ticket_id, lines = order.items.len(), "submit_active_ticket command");

    if order.items.is_empty() {
        return Err(TillError::EmptyTicket.into());
    }

    let ticket_id = order.ticket_id.clone();
    let total = order.totals.total;
    let receipt = submitter.submit(order).await?;

    // Only clear what was sent: a ticket closed or edited during the await
    // is left for the cashier.
    let next = session.replace(|s| match s.ticket(&ticket_id) {
        Some(current) if *current == submitted => s
            .update_ticket(&ticket_id, |t| Ok(t.clear()))
            .unwrap_or_else(|_| s.clone()),
        Some(_) => {
            warn!(ticket_id = %ticket_id, "Ticket changed while submitting, left as is");
            s.clone()
        }
        None => {
            warn!(ticket_id = %ticket_id, "Submitted ticket no longer open");
            s.clone()
        }
    });

    info!(
        order_no = %receipt.order_no,
        total = %config.format_currency(total),
        "Ticket submitted"
    );

    Ok(SubmitResponse {
        receipt,
        session: SessionResponse::new(&next, config.tax_rate()),
    })
}

/// Submits the edit in progress and ends it on success. On failure the
/// edit stays in progress.
pub async fn submit_edit<S: OrderSubmitter>(
    edits: &EditState,
    submitter: &S,
) -> Result<EditSubmitResponse, ApiError> {
    let edit = edits.take()?;
    let delta = edit.delta();
    debug!(order_no = %edit.order_no(), delta = %delta.signed_delta, "submit_edit command");

    let payload = EditedOrder {
        items: edit.ticket().items.clone(),
        delta,
        edited_at: Utc::now(),
    };

    match submitter.submit_edit(edit.order_no().to_string(), payload).await {
        Ok(receipt) => {
            info!(order_no = %receipt.order_no, settlement = ?delta.settlement, "Order edit submitted");
            Ok(EditSubmitResponse { receipt, delta })
        }
        Err(e) => {
            edits.restore(edit);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::edit::{begin_edit, edit_remove_line};
    use crate::commands::fixtures::{config, menu};
    use crate::commands::session::{open_ticket, set_active_ticket};
    use crate::commands::ticket::{add_selection, get_session};
    use crate::error::ErrorCode;
    use crate::submit::RecordingSubmitter;
    use tableside_core::{Money, OrderSnapshot, Selection, Settlement};

    #[tokio::test]
    async fn test_submit_clears_ticket() {
        let session = SessionState::new();
        let cfg = config();
        let submitter = RecordingSubmitter::new();
        add_selection(&menu(), &session, &cfg, Selection::new("p-1").with_quantity(2)).unwrap();
        let id = get_session(&session, &cfg).active_ticket_id;

        let res = submit_active_ticket(&session, &cfg, &submitter).await.unwrap();
        assert_eq!(res.receipt.order_no, "ORD-1001");
        assert_eq!(res.session.active_ticket_id, id);
        assert!(res.session.active_ticket().unwrap().items.is_empty());

        let orders = submitter.orders().await;
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].1.totals.subtotal.cents(), 5000);
        assert_eq!(orders[0].1.totals.total.cents(), 5250);
    }

    #[tokio::test]
    async fn test_empty_ticket_not_submitted() {
        let session = SessionState::new();
        let submitter = RecordingSubmitter::new();

        let err = submit_active_ticket(&session, &config(), &submitter).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(submitter.orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_ticket() {
        let session = SessionState::new();
        let cfg = config();
        add_selection(&menu(), &session, &cfg, Selection::new("p-2")).unwrap();
        let before = get_session(&session, &cfg);

        let err = submit_active_ticket(&session, &cfg, &RecordingSubmitter::failing())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmitError);
        assert_eq!(get_session(&session, &cfg), before);
        assert_eq!(before.active_ticket().unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_submit_only_touches_submitted_ticket() {
        let session = SessionState::new();
        let cfg = config();
        let catalog = menu();
        let first = get_session(&session, &cfg).active_ticket_id;
        add_selection(&catalog, &session, &cfg, Selection::new("p-2")).unwrap();
        open_ticket(&session, &cfg);
        add_selection(&catalog, &session, &cfg, Selection::new("p-1")).unwrap();

        submit_active_ticket(&session, &cfg, &RecordingSubmitter::new())
            .await
            .unwrap();

        let res = set_active_ticket(&session, &cfg, &first);
        assert_eq!(res.totals.subtotal.cents(), 450);
    }

    /// Adds a line to the submitted ticket while the order is in flight.
    struct AddsDuringSubmit {
        session: SessionState,
        inner: RecordingSubmitter,
    }

    #[async_trait::async_trait]
    impl OrderSubmitter for AddsDuringSubmit {
        async fn submit(&self, order: FinalizedOrder) -> crate::error::TillResult<SubmitReceipt> {
            let cfg = config();
            add_selection(&menu(), &self.session, &cfg, Selection::new("p-1")).unwrap();
            self.inner.submit(order).await
        }

        async fn submit_edit(
            &self,
            order_no: String,
            edit: EditedOrder,
        ) -> crate::error::TillResult<SubmitReceipt> {
            self.inner.submit_edit(order_no, edit).await
        }
    }

    #[tokio::test]
    async fn test_lines_added_during_submit_are_kept() {
        let session = SessionState::new();
        let cfg = config();
        add_selection(&menu(), &session, &cfg, Selection::new("p-2")).unwrap();
        let submitter = AddsDuringSubmit {
            session: session.clone(),
            inner: RecordingSubmitter::new(),
        };

        let res = submit_active_ticket(&session, &cfg, &submitter).await.unwrap();
        assert_eq!(res.receipt.order_no, "ORD-1001");

        let orders = submitter.inner.orders().await;
        assert_eq!(orders[0].1.items.len(), 1);

        let ticket = res.session.active_ticket().unwrap();
        assert_eq!(ticket.items.len(), 2);
        assert_eq!(res.session.totals.subtotal.cents(), 450 + 2500);
    }

    #[tokio::test]
    async fn test_submit_edit_round_trip() {
        let edits = EditState::new();
        let submitter = RecordingSubmitter::new();
        let snapshot = OrderSnapshot {
            order_no: "ORD-1042".to_string(),
            original_total: Money::from_cents(450),
            line_items: vec![],
            details: None,
            placed_at: Utc::now(),
        };
        begin_edit(&edits, snapshot).unwrap();

        let res = submit_edit(&edits, &submitter).await.unwrap();
        assert_eq!(res.receipt.order_no, "ORD-1042");
        assert_eq!(res.delta.settlement, Settlement::RefundDue(Money::from_cents(450)));
        assert!(!edits.is_active());
    }

    #[tokio::test]
    async fn test_failed_edit_submit_keeps_edit() {
        let edits = EditState::new();
        let snapshot = OrderSnapshot {
            order_no: "ORD-7".to_string(),
            original_total: Money::zero(),
            line_items: vec![],
            details: None,
            placed_at: Utc::now(),
        };
        begin_edit(&edits, snapshot).unwrap();

        let err = submit_edit(&edits, &RecordingSubmitter::failing()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::SubmitError);
        assert!(edits.is_active());
        assert_eq!(
            edit_remove_line(&edits, "x").unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
