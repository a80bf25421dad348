//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (the env record handles syntactic parsing)
//! - Storage host list must name at least one node
//! - Endpoint URLs must parse when set
//! - Value ranges (percentages, timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ConfigSnapshot → Result<(), Vec<ValidationError>>
//! - Runs before the snapshot is installed

use std::time::Duration;

use thiserror::Error;

use crate::config::schema::ConfigSnapshot;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{key} cannot be empty")]
    EmptyHostList { key: &'static str },

    #[error("{key} is malformed")]
    Malformed { key: &'static str },

    #[error("{key} is not a valid URL ({value:?}): {reason}")]
    InvalidUrl {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{key} must be at most {max}, got {value}")]
    OutOfRange {
        key: &'static str,
        value: u64,
        max: u64,
    },

    #[error("{key} must be greater than zero")]
    MustBePositive { key: &'static str },
}

/// Split a comma-separated host list, dropping blank entries.
pub fn split_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check a freshly built snapshot before it is accepted.
pub fn validate_config(config: &ConfigSnapshot) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.database.hosts.is_empty() {
        errors.push(ValidationError::EmptyHostList { key: "DB_HOSTS" });
    }

    check_url(&mut errors, "SKYDIO_ENDPOINT", &config.skydio.endpoint);
    check_url(&mut errors, "ASSET_SVC_ENDPOINT", &config.asset_service.endpoint);
    check_url(&mut errors, "TERMINUS_ENDPOINT", &config.terminus_endpoint);

    let usage = u64::from(config.rate_limit.usage_percentage);
    if usage > 100 {
        errors.push(ValidationError::OutOfRange {
            key: "RATE_LIMITER_USAGE",
            value: usage,
            max: 100,
        });
    }

    let web = &config.web;
    check_positive(&mut errors, "WEB_READ_TIMEOUT_SECS", web.read_timeout);
    check_positive(&mut errors, "WEB_WRITE_TIMEOUT_SECS", web.write_timeout);
    check_positive(&mut errors, "WEB_IDLE_TIMEOUT_SECS", web.idle_timeout);
    check_positive(&mut errors, "WEB_SHUTDOWN_TIMEOUT_SECS", web.shutdown_timeout);
    if web.max_connections == 0 {
        errors.push(ValidationError::MustBePositive {
            key: "WEB_MAX_CONNECTIONS",
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, key: &'static str, value: &str) {
    if value.is_empty() {
        return;
    }
    if let Err(e) = url::Url::parse(value) {
        errors.push(ValidationError::InvalidUrl {
            key,
            value: value.to_string(),
            reason: e.to_string(),
        });
    }
}

fn check_positive(errors: &mut Vec<ValidationError>, key: &'static str, value: Duration) {
    if value.is_zero() {
        errors.push(ValidationError::MustBePositive { key });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ConfigSnapshot {
        let mut config = ConfigSnapshot::default();
        config.database.hosts = vec!["scylla-0".into()];
        config
    }

    #[test]
    fn splits_hosts_in_order() {
        assert_eq!(split_hosts("a,b,c"), vec!["a", "b", "c"]);
        assert_eq!(split_hosts(" a , ,b,"), vec!["a", "b"]);
        assert!(split_hosts("").is_empty());
        assert!(split_hosts(" , ").is_empty());
    }

    #[test]
    fn accepts_minimal_config() {
        assert_eq!(validate_config(&valid()), Ok(()));
    }

    #[test]
    fn rejects_empty_host_list() {
        let mut config = valid();
        config.database.hosts.clear();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyHostList { key: "DB_HOSTS" }]);
    }

    #[test]
    fn reports_every_problem() {
        let mut config = valid();
        config.database.hosts.clear();
        config.skydio.endpoint = "not a url".into();
        config.rate_limit.usage_percentage = 150;
        config.web.shutdown_timeout = Duration::ZERO;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(matches!(errors[1], ValidationError::InvalidUrl { key: "SKYDIO_ENDPOINT", .. }));
        assert!(errors.contains(&ValidationError::MustBePositive {
            key: "WEB_SHUTDOWN_TIMEOUT_SECS"
        }));
    }
}
