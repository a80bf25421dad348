//! Process-wide configuration snapshot.
//!
//! The store initializes at most once. Reading the env file, decoding,
//! validating and installing the snapshot all run inside the same lazy-once
//! cell, so concurrent first-time callers block until the winner finishes
//! and then observe its snapshot. Readers arriving afterwards never block.
//!
//! New code should take the `Arc<ConfigSnapshot>` returned by [`ConfigStore::load`]
//! and pass it down explicitly. [`ConfigStore::global`] exists for callers
//! that cannot be handed a snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};

use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::ConfigSnapshot;

/// Source used when a snapshot is needed before anyone loaded one.
pub const DEFAULT_SOURCE: &str = ".";

static GLOBAL: Lazy<ConfigStore> = Lazy::new(ConfigStore::new);

/// Once-initialized holder of the configuration snapshot.
#[derive(Debug)]
pub struct ConfigStore {
    snapshot: OnceCell<Arc<ConfigSnapshot>>,
    default_source: PathBuf,
}

impl ConfigStore {
    /// Create an empty store falling back to [`DEFAULT_SOURCE`].
    pub fn new() -> Self {
        Self::with_default_source(DEFAULT_SOURCE)
    }

    /// Create an empty store with a custom fallback source.
    pub fn with_default_source(source: impl Into<PathBuf>) -> Self {
        Self {
            snapshot: OnceCell::new(),
            default_source: source.into(),
        }
    }

    /// The process-wide store.
    pub fn global() -> &'static ConfigStore {
        &GLOBAL
    }

    /// Load the snapshot from `source`, or return the one already installed.
    ///
    /// A failed load leaves the store empty.
    pub fn load(&self, source: impl AsRef<Path>) -> Result<Arc<ConfigSnapshot>, ConfigError> {
        let source = source.as_ref();
        self.install_with(|| load_config(source))
            .inspect(|_| tracing::debug!(source = %source.display(), "Configuration available"))
    }

    fn install_with<F>(&self, load: F) -> Result<Arc<ConfigSnapshot>, ConfigError>
    where
        F: FnOnce() -> Result<ConfigSnapshot, ConfigError>,
    {
        if let Some(existing) = self.snapshot.get() {
            return Ok(Arc::clone(existing));
        }

        let snapshot = self.snapshot.get_or_try_init(|| {
            let config = load()?;
            tracing::info!(
                db_hosts = ?config.database.hosts,
                api_host = %config.web.api_host,
                rate_limiter_enabled = config.rate_limit.enabled,
                "Configuration loaded"
            );
            Ok::<_, ConfigError>(Arc::new(config))
        })?;

        Ok(Arc::clone(snapshot))
    }

    /// The installed snapshot, if any.
    pub fn get(&self) -> Option<Arc<ConfigSnapshot>> {
        self.snapshot.get().cloned()
    }

    /// Relational store connection string.
    ///
    /// Loads from the default source first when nothing is installed yet.
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        let snapshot = match self.get() {
            Some(snapshot) => snapshot,
            None => {
                tracing::warn!(
                    source = %self.default_source.display(),
                    "Configuration requested before startup loaded it, using default source"
                );
                self.load(&self.default_source)?
            }
        };
        Ok(snapshot.postgres.connection_string())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection string from the process-wide store.
pub fn connection_string() -> Result<String, ConfigError> {
    ConfigStore::global().connection_string()
}
