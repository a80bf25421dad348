//! Configuration loading from disk.
//!
//! Reads an env-format file, overlays the process environment, decodes the
//! result into [`EnvConfig`] and builds a validated [`ConfigSnapshot`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use envconfig::Envconfig;
use thiserror::Error;

use crate::config::env::EnvConfig;
use crate::config::schema::{
    AssetServiceConfig, ConfigSnapshot, DatabaseConfig, GoogleApiConfig, ObservabilityConfig,
    PostgresConfig, RateLimitPolicy, SkydioConfig, WebConfig,
};
use crate::config::validation::{split_hosts, validate_config, ValidationError};

/// File name looked up when the source is a directory.
pub const ENV_FILE_NAME: &str = "app.env";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read env file at {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    #[error("invalid configuration: {}", join(.0))]
    Invalid(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve a source hint to the env file it names.
pub fn resolve_source(source: &Path) -> PathBuf {
    if source.is_dir() {
        source.join(ENV_FILE_NAME)
    } else {
        source.to_path_buf()
    }
}

/// Load and validate configuration from an env file or a directory holding `app.env`.
pub fn load_config(source: &Path) -> Result<ConfigSnapshot, ConfigError> {
    let path = resolve_source(source);
    // Empty values count as unset so the zero value or service default applies.
    let mut vars = read_env_file(&path)?;
    vars.retain(|_, value| !value.is_empty());

    // Process environment wins over the file.
    vars.extend(
        std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .filter(|(_, value)| !value.is_empty()),
    );

    let env = EnvConfig::init_from_hashmap(&vars)
        .map_err(|e| ConfigError::Invalid(vec![from_envconfig(e)]))?;
    let config = ConfigSnapshot::from(env);

    validate_config(&config).map_err(ConfigError::Invalid)?;

    tracing::debug!(
        path = %path.display(),
        db_hosts = config.database.hosts.len(),
        rate_limiter_enabled = config.rate_limit.enabled,
        "Configuration parsed"
    );

    Ok(config)
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
    let unreadable = |source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    dotenvy::from_path_iter(path)
        .map_err(unreadable)?
        .collect::<Result<HashMap<_, _>, _>>()
        .map_err(unreadable)
}

fn from_envconfig(error: envconfig::Error) -> ValidationError {
    match error {
        envconfig::Error::EnvVarMissing { name } | envconfig::Error::ParseError { name } => {
            ValidationError::Malformed { key: name }
        }
    }
}

impl From<EnvConfig> for ConfigSnapshot {
    fn from(env: EnvConfig) -> Self {
        Self {
            skydio: SkydioConfig {
                endpoint: env.skydio_endpoint,
                api_version: env.skydio_api_version,
            },
            database: DatabaseConfig {
                hosts: split_hosts(&env.db_hosts),
            },
            postgres: PostgresConfig {
                host: env.postgres_url,
                port: env.postgres_port,
                db_name: env.postgres_db_name,
                user_name: env.postgres_user_name,
                password: env.postgres_password,
                disable_ssl: env.postgres_ssl_disable.into(),
            },
            asset_service: AssetServiceConfig {
                endpoint: env.asset_svc_endpoint,
                cache_ttl: Duration::from_secs(env.asset_svc_ttl),
                refresh_interval: Duration::from_secs(env.asset_svc_refresh_interval),
            },
            google_api: GoogleApiConfig {
                api_token: env.google_api_token,
            },
            terminus_endpoint: env.terminus_endpoint,
            key_vault_name: env.key_vault_name,
            rate_limit: RateLimitPolicy {
                enabled: env.enable_rate_limiter.into(),
                usage_percentage: env.rate_limiter_usage,
                max_429_retries: env.max_429_retry_limit,
                vehicles: env.vehicles_limit,
                flights: env.flights_limit,
                telemetry: env.telemetry_limit,
                media: env.media_limit,
                media_by_id: env.media_by_id_limit,
                flight_by_id: env.flight_by_id_limit,
                thumbnail: env.thumbnail_limit,
                download: env.download_limit,
                webhook: env.webhook_limit,
            },
            web: WebConfig {
                api_host: env.web_api_host,
                read_timeout: Duration::from_secs(env.web_read_timeout_secs),
                write_timeout: Duration::from_secs(env.web_write_timeout_secs),
                idle_timeout: Duration::from_secs(env.web_idle_timeout_secs),
                shutdown_timeout: Duration::from_secs(env.web_shutdown_timeout_secs),
                max_connections: env.web_max_connections,
            },
            observability: ObservabilityConfig {
                metrics_enabled: env.metrics_enabled.into(),
                metrics_address: env.metrics_address,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_env(dir: &Path, body: &str) {
        fs::write(dir.join(ENV_FILE_NAME), body).unwrap();
    }

    #[test]
    fn loads_full_file() {
        let dir = tempfile::tempdir().unwrap();
        write_env(
            dir.path(),
            "SKYDIO_ENDPOINT=https://api.skydio.example\n\
             SKYDIO_APIVERSION=v0\n\
             DB_HOSTS=a,b,c\n\
             POSTGRES_URL=pg.internal\n\
             POSTGRES_PORT=6543\n\
             POSTGRES_SSL_DISABLE=true\n\
             ASSET_SVC_TTL=300\n\
             ENABLE_RATE_LIMITER=true\n\
             RATE_LIMITER_USAGE=80\n\
             TELEMETRY_LIMIT=25\n\
             MAX_429_RETRY_LIMIT=4\n",
        );

        let config = load_config(dir.path()).unwrap();

        assert_eq!(config.skydio.api_version, "v0");
        assert_eq!(config.database.hosts, vec!["a", "b", "c"]);
        assert_eq!(config.postgres.port, 6543);
        assert_eq!(config.postgres.ssl_mode(), "disable");
        assert_eq!(config.asset_service.cache_ttl, Duration::from_secs(300));
        assert!(config.rate_limit.enabled);
        assert_eq!(config.rate_limit.usage_percentage, 80);
        assert_eq!(config.rate_limit.telemetry, 25);
        assert_eq!(config.rate_limit.max_429_retries, 4);
        assert_eq!(config.web, WebConfig::default());
    }

    #[test]
    fn accepts_explicit_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.env");
        fs::write(&path, "DB_HOSTS=solo\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.hosts, vec!["solo"]);
    }

    #[test]
    fn empty_host_list_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_env(dir.path(), "DB_HOSTS=\n");

        match load_config(dir.path()) {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors, vec![ValidationError::EmptyHostList { key: "DB_HOSTS" }]);
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn negative_ceiling_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_env(dir.path(), "DB_HOSTS=a\nMEDIA_LIMIT=-5\n");

        match load_config(dir.path()) {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors, vec![ValidationError::Malformed { key: "MEDIA_LIMIT" }]);
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn empty_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write_env(
            dir.path(),
            "DB_HOSTS=a\n\
             ASSET_SVC_TTL=\n\
             VEHICLES_LIMIT=\n\
             POSTGRES_PORT=\n\
             POSTGRES_SSL_DISABLE=\n\
             WEB_SHUTDOWN_TIMEOUT_SECS=\n",
        );

        let config = load_config(dir.path()).unwrap();

        assert_eq!(config.asset_service.cache_ttl, Duration::ZERO);
        assert_eq!(config.rate_limit.vehicles, 0);
        assert_eq!(config.postgres.port, 5432);
        assert!(!config.postgres.disable_ssl);
        assert_eq!(config.web.shutdown_timeout, Duration::from_secs(20));
    }

    #[test]
    fn numeric_and_word_booleans_are_accepted() {
        for (raw, expected) in [("1", true), ("TRUE", true), ("t", true), ("0", false), ("False", false)] {
            let dir = tempfile::tempdir().unwrap();
            write_env(
                dir.path(),
                &format!("DB_HOSTS=a\nPOSTGRES_SSL_DISABLE={raw}\nENABLE_RATE_LIMITER={raw}\n"),
            );

            let config = load_config(dir.path()).unwrap();
            assert_eq!(config.postgres.disable_ssl, expected, "{raw}");
            assert_eq!(config.rate_limit.enabled, expected, "{raw}");
        }
    }

    #[test]
    fn unknown_boolean_word_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        write_env(dir.path(), "DB_HOSTS=a\nPOSTGRES_SSL_DISABLE=yes\n");

        match load_config(dir.path()) {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors, vec![ValidationError::Malformed { key: "POSTGRES_SSL_DISABLE" }]);
            }
            other => panic!("expected invalid config, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }
}
