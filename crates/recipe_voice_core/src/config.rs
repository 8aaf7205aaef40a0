//! Environment-driven handler configuration.
//!
//! # Responsibility
//! - Read process configuration once at startup.
//! - Reject missing or malformed values before any connection is attempted.
//!
//! # Invariants
//! - `RECIPE_STORE_URI` is required; absence is a fatal startup condition.
//! - Timeouts are strictly positive and at most `MAX_TIMEOUT_SECS`.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const ENV_STORE_URI: &str = "RECIPE_STORE_URI";
pub const ENV_STORE_DATABASE: &str = "RECIPE_STORE_DATABASE";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "RECIPE_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RECIPE_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "RECIPE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RECIPE_LOG_DIR";

pub const DEFAULT_DATABASE_NAME: &str = "alexa";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);
/// Upper bound for configured timeouts; keeps them within SQLite's
/// millisecond busy timeout (`i32`) and `Instant` arithmetic.
pub const MAX_TIMEOUT_SECS: u64 = 24 * 60 * 60;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "required environment variable `{key}` is not set"),
            Self::Invalid { key, message } => {
                write!(f, "invalid value for `{key}`: {message}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Connection settings for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// SQLite path or `file:` URI.
    pub uri: String,
    /// Logical database the connection is bound to.
    pub database_name: String,
    pub connect_timeout: Duration,
}

impl StoreConfig {
    /// Creates a store config with default database name and timeout.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Full process configuration for the handler host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub store: StoreConfig,
    /// Deadline applied to every dispatched invocation.
    pub request_timeout: Duration,
    pub log_level: Option<String>,
    /// Logging stays disabled when unset.
    pub log_dir: Option<String>,
}

impl HandlerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let uri = read(ENV_STORE_URI).ok_or(ConfigError::Missing(ENV_STORE_URI))?;
        let database_name =
            read(ENV_STORE_DATABASE).unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string());
        let connect_timeout = match read(ENV_CONNECT_TIMEOUT_SECS) {
            Some(value) => parse_secs(ENV_CONNECT_TIMEOUT_SECS, &value)?,
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        let request_timeout = match read(ENV_REQUEST_TIMEOUT_SECS) {
            Some(value) => parse_secs(ENV_REQUEST_TIMEOUT_SECS, &value)?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Self {
            store: StoreConfig {
                uri,
                database_name,
                connect_timeout,
            },
            request_timeout,
            log_level: read(ENV_LOG_LEVEL),
            log_dir: read(ENV_LOG_DIR),
        })
    }
}

fn parse_secs(key: &'static str, value: &str) -> ConfigResult<Duration> {
    let secs = value.parse::<u64>().map_err(|err| ConfigError::Invalid {
        key,
        message: format!("expected whole seconds, got `{value}` ({err})"),
    })?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            key,
            message: "must be greater than zero".to_string(),
        });
    }
    if secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Invalid {
            key,
            message: format!("must be at most {MAX_TIMEOUT_SECS} seconds, got {secs}"),
        });
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_uri_is_rejected() {
        let err = HandlerConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_STORE_URI));
    }

    #[test]
    fn blank_uri_is_treated_as_missing() {
        let err = HandlerConfig::from_lookup(lookup_from(&[(ENV_STORE_URI, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing(ENV_STORE_URI));
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config =
            HandlerConfig::from_lookup(lookup_from(&[(ENV_STORE_URI, "file:recipes.db")]))
                .unwrap();
        assert_eq!(config.store.uri, "file:recipes.db");
        assert_eq!(config.store.database_name, DEFAULT_DATABASE_NAME);
        assert_eq!(config.store.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn zero_or_malformed_timeouts_are_rejected() {
        let zero = HandlerConfig::from_lookup(lookup_from(&[
            (ENV_STORE_URI, ":memory:"),
            (ENV_CONNECT_TIMEOUT_SECS, "0"),
        ]))
        .unwrap_err();
        assert!(matches!(zero, ConfigError::Invalid { key, .. } if key == ENV_CONNECT_TIMEOUT_SECS));

        let malformed = HandlerConfig::from_lookup(lookup_from(&[
            (ENV_STORE_URI, ":memory:"),
            (ENV_REQUEST_TIMEOUT_SECS, "soon"),
        ]))
        .unwrap_err();
        assert!(
            matches!(malformed, ConfigError::Invalid { key, .. } if key == ENV_REQUEST_TIMEOUT_SECS)
        );
    }

    #[test]
    fn oversized_timeouts_are_rejected() {
        for key in [ENV_CONNECT_TIMEOUT_SECS, ENV_REQUEST_TIMEOUT_SECS] {
            for value in ["18446744073709551615", "3000000"] {
                let err = HandlerConfig::from_lookup(lookup_from(&[
                    (ENV_STORE_URI, ":memory:"),
                    (key, value),
                ]))
                .unwrap_err();
                assert!(
                    matches!(err, ConfigError::Invalid { key: rejected, .. } if rejected == key),
                    "key={key} value={value}"
                );
            }
        }
    }

    #[test]
    fn largest_accepted_timeout_is_usable() {
        let max = MAX_TIMEOUT_SECS.to_string();
        let config = HandlerConfig::from_lookup(lookup_from(&[
            (ENV_STORE_URI, ":memory:"),
            (ENV_CONNECT_TIMEOUT_SECS, max.as_str()),
            (ENV_REQUEST_TIMEOUT_SECS, max.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.store.connect_timeout, Duration::from_secs(MAX_TIMEOUT_SECS));
        assert!(config.store.connect_timeout.as_millis() < i32::MAX as u128);
        assert!(crate::InvocationContext::with_timeout(config.request_timeout)
            .check()
            .is_ok());
    }
}
