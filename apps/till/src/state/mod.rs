//! # Till State
//!
//! ```text
//! state/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── session.rs  ◄─── SessionState, EditState
//! └── config.rs   ◄─── TillConfig
//! ```

pub mod config;
pub mod session;

pub use config::TillConfig;
pub use session::{EditState, SessionState};
