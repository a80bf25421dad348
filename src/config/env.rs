//! Flat environment record.
//!
//! Mirrors the key names operators put in `app.env`. Every key is optional;
//! absent or empty values fall back to the zero value except for the web
//! listener, which has service defaults. Semantic checks live in
//! [`crate::config::validation`].

use std::str::FromStr;

use envconfig::Envconfig;
use thiserror::Error;

/// Boolean switch accepting the spellings operators already use:
/// `1 t T TRUE true True` and `0 f F FALSE false False`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flag(pub bool);

#[derive(Debug, Error)]
#[error("invalid boolean value: {0:?}")]
pub struct ParseFlagError(String);

impl FromStr for Flag {
    type Err = ParseFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(Flag(true)),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(Flag(false)),
            other => Err(ParseFlagError(other.to_string())),
        }
    }
}

impl From<Flag> for bool {
    fn from(flag: Flag) -> Self {
        flag.0
    }
}

#[derive(Envconfig, Debug, Clone)]
pub struct EnvConfig {
    #[envconfig(from = "SKYDIO_ENDPOINT", default = "")]
    pub skydio_endpoint: String,

    #[envconfig(from = "SKYDIO_APIVERSION", default = "")]
    pub skydio_api_version: String,

    /// Comma-separated storage node list.
    #[envconfig(from = "DB_HOSTS", default = "")]
    pub db_hosts: String,

    #[envconfig(from = "TERMINUS_ENDPOINT", default = "")]
    pub terminus_endpoint: String,

    #[envconfig(from = "ASSET_SVC_ENDPOINT", default = "")]
    pub asset_svc_endpoint: String,

    /// Seconds.
    #[envconfig(from = "ASSET_SVC_TTL", default = "0")]
    pub asset_svc_ttl: u64,

    /// Seconds.
    #[envconfig(from = "ASSET_SVC_REFRESH_INTERVAL", default = "0")]
    pub asset_svc_refresh_interval: u64,

    #[envconfig(from = "GOOGLE_API_TOKEN", default = "")]
    pub google_api_token: String,

    #[envconfig(from = "POSTGRES_URL", default = "")]
    pub postgres_url: String,

    #[envconfig(from = "POSTGRES_PORT", default = "5432")]
    pub postgres_port: u16,

    #[envconfig(from = "POSTGRES_DB_NAME", default = "")]
    pub postgres_db_name: String,

    #[envconfig(from = "POSTGRES_USER_NAME", default = "")]
    pub postgres_user_name: String,

    #[envconfig(from = "POSTGRES_PASSWORD", default = "")]
    pub postgres_password: String,

    #[envconfig(from = "POSTGRES_SSL_DISABLE", default = "false")]
    pub postgres_ssl_disable: Flag,

    #[envconfig(from = "KEY_VAULT_NAME", default = "")]
    pub key_vault_name: String,

    #[envconfig(from = "ENABLE_RATE_LIMITER", default = "false")]
    pub enable_rate_limiter: Flag,

    #[envconfig(from = "RATE_LIMITER_USAGE", default = "0")]
    pub rate_limiter_usage: u8,

    #[envconfig(from = "VEHICLES_LIMIT", default = "0")]
    pub vehicles_limit: u32,

    #[envconfig(from = "FLIGHTS_LIMIT", default = "0")]
    pub flights_limit: u32,

    #[envconfig(from = "TELEMETRY_LIMIT", default = "0")]
    pub telemetry_limit: u32,

    #[envconfig(from = "MEDIA_LIMIT", default = "0")]
    pub media_limit: u32,

    #[envconfig(from = "MEDIA_BY_ID_LIMIT", default = "0")]
    pub media_by_id_limit: u32,

    #[envconfig(from = "FLIGHT_BY_ID_LIMIT", default = "0")]
    pub flight_by_id_limit: u32,

    #[envconfig(from = "THUMBNAIL_LIMIT", default = "0")]
    pub thumbnail_limit: u32,

    #[envconfig(from = "DOWNLOAD_LIMIT", default = "0")]
    pub download_limit: u32,

    #[envconfig(from = "WEBHOOK_LIMIT", default = "0")]
    pub webhook_limit: u32,

    #[envconfig(from = "MAX_429_RETRY_LIMIT", default = "0")]
    pub max_429_retry_limit: u32,

    #[envconfig(from = "WEB_API_HOST", default = "0.0.0.0:3000")]
    pub web_api_host: String,

    #[envconfig(from = "WEB_READ_TIMEOUT_SECS", default = "5")]
    pub web_read_timeout_secs: u64,

    #[envconfig(from = "WEB_WRITE_TIMEOUT_SECS", default = "10")]
    pub web_write_timeout_secs: u64,

    #[envconfig(from = "WEB_IDLE_TIMEOUT_SECS", default = "120")]
    pub web_idle_timeout_secs: u64,

    #[envconfig(from = "WEB_SHUTDOWN_TIMEOUT_SECS", default = "20")]
    pub web_shutdown_timeout_secs: u64,

    #[envconfig(from = "WEB_MAX_CONNECTIONS", default = "10000")]
    pub web_max_connections: usize,

    #[envconfig(from = "METRICS_ENABLED", default = "false")]
    pub metrics_enabled: Flag,

    #[envconfig(from = "METRICS_ADDRESS", default = "0.0.0.0:9090")]
    pub metrics_address: String,
}
