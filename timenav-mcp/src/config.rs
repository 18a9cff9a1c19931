//! Server configuration, read once from the environment at start-up
//!
//! - `TIMENAV_LOG`: trace, debug, info (default), warn or error
//! - `TIMENAV_NOW`: ISO 8601 instant; pins the clock for reproducible sessions

use std::env;

use thiserror::Error;
use timenav_core::{Clock, FixedClock, SystemClock, Time, TimeError};
use tracing::Level;

pub const LOG_VAR: &str = "TIMENAV_LOG";
pub const NOW_VAR: &str = "TIMENAV_NOW";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: unknown log level '{value}' (expected trace, debug, info, warn or error)")]
    InvalidLogLevel { var: &'static str, value: String },

    #[error("{var}: invalid instant '{value}': {source}")]
    InvalidNow {
        var: &'static str,
        value: String,
        #[source]
        source: TimeError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub log_level: Level,
    /// Fixed "now"; the system clock is used when absent
    pub now: Option<Time>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            now: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_level = match read(LOG_VAR) {
            Some(value) => value
                .parse::<Level>()
                .map_err(|_| ConfigError::InvalidLogLevel { var: LOG_VAR, value })?,
            None => Level::INFO,
        };

        let now = match read(NOW_VAR) {
            Some(value) => match Time::parse(&value) {
                Ok(time) => Some(time),
                Err(source) => {
                    return Err(ConfigError::InvalidNow {
                        var: NOW_VAR,
                        value,
                        source,
                    })
                }
            },
            None => None,
        };

        Ok(Self { log_level, now })
    }

    pub fn clock(&self) -> Box<dyn Clock> {
        match self.now {
            Some(now) => Box::new(FixedClock::new(now)),
            None => Box::new(SystemClock),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.now.is_none());
    }

    #[test]
    fn test_reads_level_and_now() {
        let config = ServerConfig::from_lookup(lookup(&[
            (LOG_VAR, "debug"),
            (NOW_VAR, "2009-05-01T12:00"),
        ]))
        .unwrap();
        assert_eq!(config.log_level, Level::DEBUG);
        let now = Time::from_ymd_hm(2009, 5, 1, 12, 0).unwrap();
        assert_eq!(config.now, Some(now));
        assert_eq!(config.clock().now(), now);
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = ServerConfig::from_lookup(lookup(&[(LOG_VAR, "  "), (NOW_VAR, "")])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ServerConfig::from_lookup(lookup(&[(LOG_VAR, "loud")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogLevel { .. }));
        assert!(err.to_string().contains("loud"));

        let err = ServerConfig::from_lookup(lookup(&[(NOW_VAR, "2009-02-30")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNow { .. }));
        assert!(err.to_string().starts_with(NOW_VAR));
    }
}
