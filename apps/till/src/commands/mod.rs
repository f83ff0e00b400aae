//! # Till Commands
//!
//! One function per cashier action. The IPC bridge (`ipc.rs`) maps
//! requests onto these.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports, SessionResponse)
//! ├── ticket.rs   ◄─── add_selection, update_quantity, remove_line, ...
//! ├── session.rs  ◄─── open_ticket, close_ticket, set_active_ticket
//! ├── discount.rs ◄─── apply_discount (preview)
//! ├── edit.rs     ◄─── begin_edit, edit_*, edit_delta
//! ├── submit.rs   ◄─── submit_active_ticket, submit_edit
//! └── config.rs   ◄─── get_store_info, get_menu
//! ```
//!
//! ## State Injection
//! Each command declares only the state it needs:
//! ```rust,ignore
//! // Only needs the session
//! fn remove_line(session: &SessionState, config: &TillConfig, line_id: &str)
//!
//! // Needs the menu too
//! fn add_selection(catalog: &impl Catalog, session: &SessionState, ...)
//!
//! // Talks to the orders service
//! async fn submit_active_ticket(session: &SessionState, ..., submitter: &impl OrderSubmitter)
//! ```

use serde::Serialize;
use tableside_core::{compute_totals, Session, TaxRate, Ticket, Totals};

pub mod config;
pub mod discount;
pub mod edit;
pub mod session;
pub mod submit;
pub mod ticket;

/// Session contents plus totals of the active ticket. Returned by every
/// command that changes the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub tickets: Vec<Ticket>,
    pub active_ticket_id: String,
    pub totals: Totals,
}

impl SessionResponse {
    pub fn new(session: &Session, tax_rate: TaxRate) -> Self {
        SessionResponse {
            tickets: session.tickets().to_vec(),
            active_ticket_id: session.active_ticket_id().to_string(),
            totals: compute_totals(session.active_ticket(), tax_rate),
        }
    }

    /// The active ticket in this response.
    pub fn active_ticket(&self) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == self.active_ticket_id)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use tableside_core::{Money, Product};

    use crate::catalog::MenuCatalog;
    use crate::state::TillConfig;

    /// Margherita with a Large variant and two add-ons, plus a drink.
    pub fn menu() -> MenuCatalog {
        MenuCatalog::new(vec![
            Product::new("p-1", "Margherita Pizza", "Pizza", Money::from_cents(2500))
                .with_variant("Large", Money::from_cents(4250))
                .with_add_on("a-1", "Extra Cheese", Money::from_cents(240))
                .with_add_on("a-2", "Olives", Money::from_cents(150)),
            Product::new("p-2", "Lemonade", "Drinks", Money::from_cents(450)),
        ])
    }

    /// 5% tax.
    pub fn config() -> TillConfig {
        let mut config = TillConfig::default();
        config.tax.rate_bps = 500;
        config
    }
}
