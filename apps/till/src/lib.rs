//! # Tableside Till Library
//!
//! Session layer of the till: holds the open tickets, talks to the menu
//! catalog and the orders service, and exposes one command per cashier
//! action. All arithmetic and merge rules live in `tableside-core`.
//!
//! ## Module Organization
//! ```text
//! tableside_till/
//! ├── lib.rs          ◄─── You are here (tracing setup, exports)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── session.rs  ◄─── Open tickets + edit in progress
//! │   └── config.rs   ◄─── till.toml / TABLESIDE_* configuration
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports, SessionResponse
//! │   ├── ticket.rs   ◄─── Line item commands on the active ticket
//! │   ├── session.rs  ◄─── Open / close / switch tickets
//! │   ├── discount.rs ◄─── Discount preview
//! │   ├── edit.rs     ◄─── Placed-order edit flow
//! │   ├── submit.rs   ◄─── Finalize and hand off to the orders service
//! │   └── config.rs   ◄─── Store info for the UI
//! ├── catalog.rs      ◄─── Read-only menu lookup
//! ├── submit.rs       ◄─── Orders service hook
//! ├── ipc.rs          ◄─── JSON-lines request dispatch
//! └── error.rs        ◄─── TillError / ApiError
//! ```
//!
//! ## State Management
//! Each command takes only the state it needs:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ┌──────────────────┐ ┌──────────────────┐ ┌──────────────────────┐    │
//! │  │  SessionState    │ │    EditState     │ │    TillConfig        │    │
//! │  │                  │ │                  │ │                      │    │
//! │  │  • 1..=2 tickets │ │  • Order being   │ │  • Store name        │    │
//! │  │  • Active id     │ │    edited        │ │  • Tax rate          │    │
//! │  └──────────────────┘ └──────────────────┘ └──────────────────────┘    │
//! │                                                                         │
//! │  ┌──────────────────┐ ┌──────────────────┐                              │
//! │  │  MenuCatalog     │ │  OrderSubmitter  │                              │
//! │  │  (read-only)     │ │  (async hook)    │                              │
//! │  └──────────────────┘ └──────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod catalog;
pub mod commands;
pub mod error;
pub mod ipc;
pub mod state;
pub mod submit;

pub use error::{ApiError, ErrorCode, TillError, TillResult};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug`: Verbose debugging
/// - `RUST_LOG=info`: Normal operation (default)
/// - `RUST_LOG=tableside=trace`: Trace our crates only
///
/// Logs go to stderr; stdout carries the IPC responses.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tableside=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
