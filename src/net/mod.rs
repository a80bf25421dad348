//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept, connection limits)
//!     → connection.rs (ID, open-connection count, idle tracking)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - Bounded accept prevents resource exhaustion
//! - Each connection holds a permit and a guard until its task ends,
//!   so aborted connections still release their slot

pub mod connection;
pub mod listener;

pub use connection::{ConnectionId, ConnectionTracker, IdleClock};
pub use listener::{Listener, ListenerError};
