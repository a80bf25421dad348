//! Skydio webhook service bootstrap.
//!
//! Loads the environment-backed configuration once, hosts the HTTP API and
//! coordinates graceful shutdown.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::{ConfigSnapshot, ConfigStore};
pub use http::HttpServer;
pub use lifecycle::{ServerLifecycle, Shutdown};
