//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (hyper connection, timeouts, middleware)
//!     → routes.rs (liveness / readiness)
//!     → Send to client
//! ```

pub mod routes;
pub mod server;

pub use routes::web_api;
pub use server::HttpServer;
