//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Start optional background exporters
//! - Hand the route table to the server lifecycle
//!
//! # Design Decisions
//! - Fail fast: any configuration error aborts before a listener exists
//! - Errors are returned to `main`, which alone picks the exit code

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::{ConfigError, ConfigSnapshot, ConfigStore};
use crate::http::routes;
use crate::lifecycle::coordinator::{ServerError, ServerLifecycle};
use crate::observability::metrics;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Load configuration from `config_path` and serve until shutdown.
pub async fn start(config_path: &Path) -> Result<(), StartupError> {
    let parallelism = std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);
    tracing::info!(parallelism, "Startup");

    let config = ConfigStore::global().load(config_path)?;
    serve(config).await
}

/// Serve the route table with an already loaded snapshot.
pub async fn serve(config: Arc<ConfigSnapshot>) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let policy = &config.rate_limit;
    tracing::info!(
        enabled = policy.enabled,
        usage_percentage = policy.usage_percentage,
        max_429_retries = policy.max_429_retries,
        "Rate limit policy"
    );
    for (category, ceiling) in policy.ceilings() {
        tracing::debug!(category = %category, ceiling, "Rate limit ceiling");
    }

    tracing::info!("Initializing V1 API support");
    let lifecycle = ServerLifecycle::new(config);
    lifecycle.run(routes::web_api()).await?;
    Ok(())
}
