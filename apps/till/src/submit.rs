//! # Orders Service Hook
//!
//! Finalized tickets and edited orders leave the till through an
//! `OrderSubmitter`. Persistence, payment and kitchen routing happen on the
//! other side of this trait.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  submit_active_ticket                                                   │
//! │       │                                                                 │
//! │       ├── snapshot ticket + totals (lock released)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderSubmitter::submit(FinalizedOrder).await                           │
//! │       │                                                                 │
//! │       ├── Ok(receipt) ──► clear that ticket                             │
//! │       └── Err ──────────► session untouched, cashier can retry          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tableside_core::{EditDelta, LineItem, OrderDetails, Ticket, Totals};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::error::{TillError, TillResult};

// =============================================================================
// Payloads
// =============================================================================

/// A ticket ready for the kitchen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedOrder {
    pub ticket_id: String,
    pub items: Vec<LineItem>,
    pub details: Option<OrderDetails>,
    pub kitchen_note: String,
    pub order_note: String,
    pub totals: Totals,
    pub submitted_at: DateTime<Utc>,
}

impl FinalizedOrder {
    pub fn new(ticket: &Ticket, totals: Totals) -> Self {
        FinalizedOrder {
            ticket_id: ticket.id.clone(),
            items: ticket.items.clone(),
            details: ticket.details.clone(),
            kitchen_note: ticket.kitchen_note.clone(),
            order_note: ticket.order_note.clone(),
            totals,
            submitted_at: Utc::now(),
        }
    }
}

/// The new line set of a placed order plus its settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedOrder {
    pub items: Vec<LineItem>,
    pub delta: EditDelta,
    pub edited_at: DateTime<Utc>,
}

/// What the orders service returns on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReceipt {
    pub order_no: String,
    pub submission_id: String,
}

// =============================================================================
// Submitter Trait
// =============================================================================

/// Async hook towards the orders service.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, order: FinalizedOrder) -> TillResult<SubmitReceipt>;

    async fn submit_edit(&self, order_no: String, edit: EditedOrder) -> TillResult<SubmitReceipt>;
}

// =============================================================================
// Recording Submitter
// =============================================================================

#[derive(Debug, Default)]
struct Recorded {
    orders: Vec<(String, FinalizedOrder)>,
    edits: Vec<(String, EditedOrder)>,
}

/// In-memory submitter. Assigns sequential order numbers starting at
/// ORD-1001 and keeps everything it was given.
#[derive(Debug, Clone)]
pub struct RecordingSubmitter {
    recorded: Arc<Mutex<Recorded>>,
    next_order_no: Arc<AtomicU64>,
    failing: bool,
}

impl RecordingSubmitter {
    pub fn new() -> Self {
        RecordingSubmitter {
            recorded: Arc::new(Mutex::new(Recorded::default())),
            next_order_no: Arc::new(AtomicU64::new(1001)),
            failing: false,
        }
    }

    /// A submitter whose every call fails, as if the service were down.
    pub fn failing() -> Self {
        RecordingSubmitter {
            failing: true,
            ..Self::new()
        }
    }

    pub async fn orders(&self) -> Vec<(String, FinalizedOrder)> {
        self.recorded.lock().await.orders.clone()
    }

    pub async fn edits(&self) -> Vec<(String, EditedOrder)> {
        self.recorded.lock().await.edits.clone()
    }

    fn receipt(order_no: String) -> SubmitReceipt {
        SubmitReceipt {
            order_no,
            submission_id: Uuid::new_v4().to_string(),
        }
    }
}

impl Default for RecordingSubmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl OrderSubmitter for RecordingSubmitter {
    async fn submit(&self, order: FinalizedOrder) -> TillResult<SubmitReceipt> {
        if self.failing {
            return Err(TillError::SubmitFailed("orders service unavailable".into()));
        }

        let order_no = format!("ORD-{}", self.next_order_no.fetch_add(1, Ordering::SeqCst));
        info!(
            order_no = %order_no,
            ticket_id = %order.ticket_id,
            total = %order.totals.total,
            "Order submitted"
        );
        self.recorded.lock().await.orders.push((order_no.clone(), order));
        Ok(Self::receipt(order_no))
    }

    async fn submit_edit(&self, order_no: String, edit: EditedOrder) -> TillResult<SubmitReceipt> {
        if self.failing {
            return Err(TillError::SubmitFailed("orders service unavailable".into()));
        }

        info!(
            order_no = %order_no,
            delta = %edit.delta.signed_delta,
            "Order edit submitted"
        );
        self.recorded.lock().await.edits.push((order_no.clone(), edit));
        Ok(Self::receipt(order_no))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableside_core::{compute_totals, reconcile, Money, Product, Selection, TaxRate};

    fn order() -> FinalizedOrder {
        let soup = Product::new("p-1", "Soup", "Starters", Money::from_cents(600));
        let ticket = Ticket::new()
            .add_selection(&soup, &Selection::new("p-1"))
            .unwrap();
        let totals = compute_totals(&ticket, TaxRate::zero());
        FinalizedOrder::new(&ticket, totals)
    }

    #[tokio::test]
    async fn test_sequential_order_numbers() {
        let submitter = RecordingSubmitter::new();
        let first = submitter.submit(order()).await.unwrap();
        let second = submitter.submit(order()).await.unwrap();

        assert_eq!(first.order_no, "ORD-1001");
        assert_eq!(second.order_no, "ORD-1002");
        assert_ne!(first.submission_id, second.submission_id);
        assert_eq!(submitter.orders().await.len(), 2);
    }

    #[tokio::test]
    async fn test_edit_recorded_under_order_no() {
        let submitter = RecordingSubmitter::new();
        let edit = EditedOrder {
            items: vec![],
            delta: reconcile(Money::from_cents(5230), &[]),
            edited_at: Utc::now(),
        };

        let receipt = submitter.submit_edit("ORD-1042".to_string(), edit).await.unwrap();
        assert_eq!(receipt.order_no, "ORD-1042");

        let edits = submitter.edits().await;
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].1.delta.signed_delta.cents(), -5230);
    }

    #[tokio::test]
    async fn test_failing_submitter_records_nothing() {
        let submitter = RecordingSubmitter::failing();
        assert!(matches!(
            submitter.submit(order()).await,
            Err(TillError::SubmitFailed(_))
        ));
        assert!(submitter.orders().await.is_empty());
    }
}
