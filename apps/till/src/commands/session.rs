//! # Session Commands
//!
//! Switching between the cashier's open tickets. At most two are open at a
//! time and there is always at least one, so these never fail: a refused
//! request simply returns the unchanged session.

use tableside_core::Session;
use tracing::debug;

use super::SessionResponse;
use crate::state::{SessionState, TillConfig};

/// Opens a second ticket and makes it active. No-op when two are open.
pub fn open_ticket(session: &SessionState, config: &TillConfig) -> SessionResponse {
    debug!("open_ticket command");
    let next = session.replace(Session::open_ticket);
    SessionResponse::new(&next, config.tax_rate())
}

/// Closes a ticket, discarding its lines. The last ticket cannot be closed.
pub fn close_ticket(session: &SessionState, config: &TillConfig, ticket_id: &str) -> SessionResponse {
    debug!(ticket_id, "close_ticket command");
    let next = session.replace(|s| s.close_ticket(ticket_id));
    SessionResponse::new(&next, config.tax_rate())
}

/// Makes another open ticket active.
pub fn set_active_ticket(
    session: &SessionState,
    config: &TillConfig,
    ticket_id: &str,
) -> SessionResponse {
    debug!(ticket_id, "set_active_ticket command");
    let next = session.replace(|s| s.set_active_ticket(ticket_id));
    SessionResponse::new(&next, config.tax_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, menu};
    use crate::commands::ticket::{add_selection, get_session};
    use tableside_core::Selection;

    #[test]
    fn test_open_is_capped_at_two() {
        let session = SessionState::new();
        let cfg = config();

        let res = open_ticket(&session, &cfg);
        assert_eq!(res.tickets.len(), 2);
        assert_eq!(res.active_ticket_id, res.tickets[1].id);

        let res = open_ticket(&session, &cfg);
        assert_eq!(res.tickets.len(), 2);
    }

    #[test]
    fn test_last_ticket_cannot_close() {
        let session = SessionState::new();
        let cfg = config();
        let id = get_session(&session, &cfg).active_ticket_id;

        let res = close_ticket(&session, &cfg, &id);
        assert_eq!(res.tickets.len(), 1);
        assert_eq!(res.active_ticket_id, id);
    }

    #[test]
    fn test_switching_keeps_each_ticket_separate() {
        let session = SessionState::new();
        let cfg = config();
        let catalog = menu();

        let first = get_session(&session, &cfg).active_ticket_id;
        add_selection(&catalog, &session, &cfg, Selection::new("p-2")).unwrap();

        let second = open_ticket(&session, &cfg).active_ticket_id;
        let res = add_selection(&catalog, &session, &cfg, Selection::new("p-1")).unwrap();
        assert_eq!(res.totals.subtotal.cents(), 2500);

        let res = set_active_ticket(&session, &cfg, &first);
        assert_eq!(res.totals.subtotal.cents(), 450);

        let res = close_ticket(&session, &cfg, &first);
        assert_eq!(res.tickets.len(), 1);
        assert_eq!(res.active_ticket_id, second);
        assert_eq!(res.totals.subtotal.cents(), 2500);
    }

    #[test]
    fn test_unknown_ticket_ids_are_ignored() {
        let session = SessionState::new();
        let cfg = config();
        open_ticket(&session, &cfg);
        let before = get_session(&session, &cfg);

        assert_eq!(set_active_ticket(&session, &cfg, "ghost"), before);
        assert_eq!(close_ticket(&session, &cfg, "ghost"), before);
    }
}
