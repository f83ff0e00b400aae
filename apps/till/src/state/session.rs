//! # Session State
//!
//! Holds the cashier's open tickets and the placed order being edited.
//!
//! ## Thread Safety
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SessionState = Arc<Mutex<Session>>                                     │
//! │                                                                         │
//! │  Command ──► lock ──► next = f(&current)? ──► *current = next ──► drop  │
//! │                              │                                          │
//! │                              └── Err: current untouched                 │
//! │                                                                         │
//! │  Session is never mutated in place; a whole new value replaces it.      │
//! │  The lock is never held across an await point.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use tableside_core::{CoreResult, OrderEdit, Session};

use crate::error::{TillError, TillResult};

// =============================================================================
// Session State
// =============================================================================

/// Shared session holding 1..=2 tickets.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Arc<Mutex<Session>>,
}

impl SessionState {
    /// Creates a state with one empty ticket.
    pub fn new() -> Self {
        SessionState::from_session(Session::new())
    }

    pub fn from_session(session: Session) -> Self {
        SessionState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Sessions are swapped whole; a poisoned value is still consistent.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Executes a function with read access to the session.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let id = state.with_session(|s| s.active_ticket_id().to_string());
    /// ```
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Session) -> R,
    {
        let session = self.lock();
        f(&session)
    }

    /// Computes the next session and swaps it in. On error nothing changes.
    pub fn apply<F>(&self, f: F) -> CoreResult<Session>
    where
        F: FnOnce(&Session) -> CoreResult<Session>,
    {
        let mut session = self.lock();
        let next = f(&session)?;
        *session = next.clone();
        Ok(next)
    }

    /// Like `apply`, for transforms that cannot fail.
    pub fn replace<F>(&self, f: F) -> Session
    where
        F: FnOnce(&Session) -> Session,
    {
        let mut session = self.lock();
        let next = f(&session);
        *session = next.clone();
        next
    }

    /// Snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.with_session(Session::clone)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Edit State
// =============================================================================

/// The placed order currently being edited, if any.
#[derive(Debug, Clone, Default)]
pub struct EditState {
    edit: Arc<Mutex<Option<OrderEdit>>>,
}

impl EditState {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<OrderEdit>> {
        self.edit.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces any edit in progress.
    pub fn start(&self, edit: OrderEdit) -> OrderEdit {
        let mut slot = self.lock();
        *slot = Some(edit.clone());
        edit
    }

    /// Current edit, or `NoEditInProgress`.
    pub fn current(&self) -> TillResult<OrderEdit> {
        self.lock().clone().ok_or(TillError::NoEditInProgress)
    }

    /// Applies a transform to the edit in progress.
    pub fn apply<F>(&self, f: F) -> Result<OrderEdit, crate::error::ApiError>
    where
        F: FnOnce(&OrderEdit) -> CoreResult<OrderEdit>,
    {
        let mut slot = self.lock();
        let current = slot.as_ref().ok_or(TillError::NoEditInProgress)?;
        let next = f(current)?;
        *slot = Some(next.clone());
        Ok(next)
    }

    /// Ends the edit, returning it.
    pub fn take(&self) -> TillResult<OrderEdit> {
        self.lock().take().ok_or(TillError::NoEditInProgress)
    }

    /// Puts an edit back, e.g. after a failed submit.
    pub fn restore(&self, edit: OrderEdit) {
        let mut slot = self.lock();
        if slot.is_none() {
            *slot = Some(edit);
        }
    }

    pub fn is_active(&self) -> bool {
        self.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tableside_core::{CoreError, Money, OrderSnapshot, Product, Selection};

    fn burger() -> Product {
        Product::new("p-1", "Burger", "Mains", Money::from_cents(1200))
    }

    #[test]
    fn test_apply_swaps_whole_session() {
        let state = SessionState::new();
        let next = state
            .apply(|s| s.update_active_ticket(|t| t.add_selection(&burger(), &Selection::new("p-1"))))
            .unwrap();

        assert_eq!(next.active_ticket().item_count(), 1);
        assert_eq!(state.with_session(|s| s.active_ticket().item_count()), 1);
    }

    #[test]
    fn test_failed_apply_leaves_state_intact() {
        let state = SessionState::new();
        state
            .apply(|s| s.update_active_ticket(|t| t.add_selection(&burger(), &Selection::new("p-1"))))
            .unwrap();
        let before = state.snapshot();

        let err = state
            .apply(|s| s.update_active_ticket(|t| t.update_quantity("missing", 1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::LineItemNotFound(_)));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_clones_share_the_session() {
        let state = SessionState::new();
        let other = state.clone();
        state.replace(Session::open_ticket);
        assert_eq!(other.with_session(|s| s.tickets().len()), 2);
    }

    #[test]
    fn test_edit_state_lifecycle() {
        let edits = EditState::new();
        assert!(!edits.is_active());
        assert!(matches!(edits.current(), Err(TillError::NoEditInProgress)));

        let snapshot = OrderSnapshot {
            order_no: "ORD-7".to_string(),
            original_total: Money::zero(),
            line_items: vec![],
            details: None,
            placed_at: Utc::now(),
        };
        edits.start(OrderEdit::begin(&snapshot).unwrap());
        assert!(edits.is_active());

        let edit = edits
            .apply(|e| e.apply(|t| t.add_selection(&burger(), &Selection::new("p-1"))))
            .unwrap();
        assert_eq!(edit.ticket().item_count(), 1);

        let taken = edits.take().unwrap();
        assert_eq!(taken.order_no(), "ORD-7");
        assert!(!edits.is_active());

        edits.restore(taken);
        assert!(edits.is_active());
    }

    #[test]
    fn test_edit_apply_without_edit_fails() {
        let edits = EditState::new();
        let err = edits.apply(|e| Ok(e.clone())).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::EditError);
    }
}
