//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! app.env (+ process environment)
//!     → loader.rs (read & overlay)
//!     → env.rs (typed flat record)
//!     → validation.rs (semantic checks)
//!     → ConfigSnapshot (validated, immutable)
//!     → store.rs (installed once, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - Unset keys fall back to zero values, web settings to service defaults
//! - Validation separates syntactic (env decoding) from semantic checks
//! - Errors are returned to the caller, never turned into process exits here

pub mod env;
pub mod loader;
pub mod schema;
pub mod store;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AssetServiceConfig, ConfigSnapshot, DatabaseConfig, GoogleApiConfig, ObservabilityConfig,
    PostgresConfig, RateLimitPolicy, ResourceCategory, SkydioConfig, WebConfig,
};
pub use store::{connection_string, ConfigStore};
pub use validation::ValidationError;
