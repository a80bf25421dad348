//! Configuration schema definitions.
//!
//! This module defines the typed snapshot the service runs with. A snapshot
//! is built once by the loader from the flat environment record in
//! [`crate::config::env`] and never mutated afterwards.

use std::fmt;
use std::time::Duration;

/// Root configuration for the webhook service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigSnapshot {
    /// External Skydio API endpoint.
    pub skydio: SkydioConfig,

    /// Storage cluster (Scylla) nodes.
    pub database: DatabaseConfig,

    /// Relational store connection settings.
    pub postgres: PostgresConfig,

    /// Asset service endpoint and cache policy.
    pub asset_service: AssetServiceConfig,

    /// Google API credentials.
    pub google_api: GoogleApiConfig,

    /// Terminus endpoint, empty when not configured.
    pub terminus_endpoint: String,

    /// Name of the secret store holding service credentials.
    pub key_vault_name: String,

    /// Limits handed to the outbound rate limiter.
    pub rate_limit: RateLimitPolicy,

    /// HTTP listener settings.
    pub web: WebConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// External API endpoint descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkydioConfig {
    pub endpoint: String,
    pub api_version: String,
}

/// Storage node addresses, in the order they were configured.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseConfig {
    pub hosts: Vec<String>,
}

/// Relational store connection fields.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub db_name: String,
    pub user_name: String,
    pub password: String,
    pub disable_ssl: bool,
}

impl PostgresConfig {
    /// TLS mode understood by libpq-style drivers.
    pub fn ssl_mode(&self) -> &'static str {
        if self.disable_ssl {
            "disable"
        } else {
            "require"
        }
    }

    /// Build a keyword/value connection string for the relational store.
    pub fn connection_string(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={}",
            self.host,
            self.port,
            self.db_name,
            self.user_name,
            self.password,
            self.ssl_mode()
        )
    }
}

impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("db_name", &self.db_name)
            .field("user_name", &self.user_name)
            .field("password", &"<redacted>")
            .field("disable_ssl", &self.disable_ssl)
            .finish()
    }
}

/// Asset service endpoint and cache policy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AssetServiceConfig {
    pub endpoint: String,

    /// Cache entry lifetime.
    pub cache_ttl: Duration,

    /// Interval between cache refreshes.
    pub refresh_interval: Duration,
}

#[derive(Clone, PartialEq, Eq, Default)]
pub struct GoogleApiConfig {
    pub api_token: String,
}

impl fmt::Debug for GoogleApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.api_token.is_empty() { "" } else { "<redacted>" };
        f.debug_struct("GoogleApiConfig")
            .field("api_token", &token)
            .finish()
    }
}

/// A class of upstream API request with its own request ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Vehicles,
    Flights,
    Telemetry,
    Media,
    MediaById,
    FlightById,
    Thumbnail,
    Download,
    Webhook,
}

impl ResourceCategory {
    /// Every category, in declaration order.
    pub const ALL: [ResourceCategory; 9] = [
        ResourceCategory::Vehicles,
        ResourceCategory::Flights,
        ResourceCategory::Telemetry,
        ResourceCategory::Media,
        ResourceCategory::MediaById,
        ResourceCategory::FlightById,
        ResourceCategory::Thumbnail,
        ResourceCategory::Download,
        ResourceCategory::Webhook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Vehicles => "vehicles",
            ResourceCategory::Flights => "flights",
            ResourceCategory::Telemetry => "telemetry",
            ResourceCategory::Media => "media",
            ResourceCategory::MediaById => "media_by_id",
            ResourceCategory::FlightById => "flight_by_id",
            ResourceCategory::Thumbnail => "thumbnail",
            ResourceCategory::Download => "download",
            ResourceCategory::Webhook => "webhook",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rate limiting policy consumed by the outbound API limiter.
///
/// Pure data: enforcement lives with the limiter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RateLimitPolicy {
    /// Enable rate limiting.
    pub enabled: bool,

    /// Share of each ceiling the limiter may use, in percent.
    pub usage_percentage: u8,

    /// Maximum retries for a request answered with 429.
    pub max_429_retries: u32,

    pub vehicles: u32,
    pub flights: u32,
    pub telemetry: u32,
    pub media: u32,
    pub media_by_id: u32,
    pub flight_by_id: u32,
    pub thumbnail: u32,
    pub download: u32,
    pub webhook: u32,
}

impl RateLimitPolicy {
    /// Request ceiling configured for `category`.
    pub fn ceiling(&self, category: ResourceCategory) -> u32 {
        match category {
            ResourceCategory::Vehicles => self.vehicles,
            ResourceCategory::Flights => self.flights,
            ResourceCategory::Telemetry => self.telemetry,
            ResourceCategory::Media => self.media,
            ResourceCategory::MediaById => self.media_by_id,
            ResourceCategory::FlightById => self.flight_by_id,
            ResourceCategory::Thumbnail => self.thumbnail,
            ResourceCategory::Download => self.download,
            ResourceCategory::Webhook => self.webhook,
        }
    }

    /// All `(category, ceiling)` pairs.
    pub fn ceilings(&self) -> impl Iterator<Item = (ResourceCategory, u32)> + '_ {
        ResourceCategory::ALL
            .into_iter()
            .map(move |category| (category, self.ceiling(category)))
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub api_host: String,

    /// Time allowed for a client to send request headers.
    pub read_timeout: Duration,

    /// Time allowed to produce a response.
    pub write_timeout: Duration,

    /// Keep-alive connections with no request for this long are closed.
    pub idle_timeout: Duration,

    /// Upper bound on graceful drain at shutdown.
    pub shutdown_timeout: Duration,

    /// Maximum concurrent connections (backpressure).
    pub max_connections: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0:3000".to_string(),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(120),
            shutdown_timeout: Duration::from_secs(20),
            max_connections: 10_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres(disable_ssl: bool) -> PostgresConfig {
        PostgresConfig {
            host: "db.internal".into(),
            port: 5432,
            db_name: "webhooks".into(),
            user_name: "svc".into(),
            password: "hunter2".into(),
            disable_ssl,
        }
    }

    #[test]
    fn connection_string_disables_ssl() {
        assert_eq!(
            postgres(true).connection_string(),
            "host=db.internal port=5432 dbname=webhooks user=svc password=hunter2 sslmode=disable"
        );
    }

    #[test]
    fn connection_string_requires_ssl_by_default() {
        assert!(postgres(false).connection_string().ends_with("sslmode=require"));
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", postgres(false));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn policy_covers_every_category() {
        let policy = RateLimitPolicy {
            vehicles: 1,
            flights: 2,
            telemetry: 3,
            media: 4,
            media_by_id: 5,
            flight_by_id: 6,
            thumbnail: 7,
            download: 8,
            webhook: 9,
            ..Default::default()
        };

        let ceilings: Vec<u32> = policy.ceilings().map(|(_, limit)| limit).collect();
        assert_eq!(ceilings, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(policy.ceiling(ResourceCategory::FlightById), 6);
    }
}
