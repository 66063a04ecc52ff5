//! Settings file loading and validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Settings location when running under the `DOCKER` marker variable
/// (mounted secret).
const DOCKER_SECRET_PATH: &str = "/var/run/secrets/.config";

/// Settings location otherwise.
const LOCAL_CONFIG_PATH: &str = ".config";

/// Startup-fatal configuration failures. The daemon does not start without
/// a complete, valid settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("reading config from {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// Settings file is not valid JSON.
    #[error("config at {path} is not valid JSON: {source}")]
    Parse {
        /// Path that was read.
        path: PathBuf,
        /// Underlying decode failure.
        #[source]
        source: serde_json::Error,
    },
    /// `apikey` missing or empty.
    #[error("apikey not set")]
    ApiKeyNotSet,
    /// `interval` missing or empty.
    #[error("interval not set")]
    IntervalNotSet,
    /// `interval` present but not a positive whole number of hours.
    #[error("interval `{0}` is not a positive whole number of hours")]
    BadInterval(String),
    /// `target` missing or empty.
    #[error("target not set")]
    TargetNotSet,
}

/// On-disk settings, deliberately tiny: one secret, one knob, one target.
/// `interval` stays a string to match the managed-secret format.
#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default)]
    apikey: String,
    #[serde(default)]
    interval: String,
    #[serde(default)]
    target: String,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential sent to the scanner service.
    pub api_key: String,
    /// Lookback window in hours; doubles as the tick cadence.
    pub lookback_hours: i64,
    /// The npm package whose dependents are watched.
    pub target: String,
}

impl Config {
    /// Loads and validates the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Self::validate(settings)
    }

    fn validate(settings: Settings) -> Result<Self, ConfigError> {
        if settings.apikey.is_empty() {
            return Err(ConfigError::ApiKeyNotSet);
        }
        if settings.interval.is_empty() {
            return Err(ConfigError::IntervalNotSet);
        }
        let lookback_hours: i64 = settings
            .interval
            .parse()
            .map_err(|_| ConfigError::BadInterval(settings.interval.clone()))?;
        if lookback_hours < 1 {
            return Err(ConfigError::BadInterval(settings.interval));
        }
        if settings.target.is_empty() {
            return Err(ConfigError::TargetNotSet);
        }
        Ok(Self {
            api_key: settings.apikey,
            lookback_hours,
            target: settings.target,
        })
    }
}

/// Default settings path: local `.config`, or the mounted secret when the
/// `DOCKER` variable is set.
pub fn default_path() -> PathBuf {
    match std::env::var_os("DOCKER") {
        Some(v) if !v.is_empty() => PathBuf::from(DOCKER_SECRET_PATH),
        _ => PathBuf::from(LOCAL_CONFIG_PATH),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(apikey: &str, interval: &str, target: &str) -> Settings {
        Settings {
            apikey: apikey.to_string(),
            interval: interval.to_string(),
            target: target.to_string(),
        }
    }

    #[test]
    fn test_valid_settings() {
        let config = Config::validate(settings("key", "12", "left-pad")).unwrap();
        assert_eq!(config.api_key, "key");
        assert_eq!(config.lookback_hours, 12);
        assert_eq!(config.target, "left-pad");
    }

    #[test]
    fn test_missing_apikey_rejected() {
        let err = Config::validate(settings("", "12", "left-pad")).unwrap_err();
        assert!(matches!(err, ConfigError::ApiKeyNotSet));
    }

    #[test]
    fn test_missing_interval_rejected() {
        let err = Config::validate(settings("key", "", "left-pad")).unwrap_err();
        assert!(matches!(err, ConfigError::IntervalNotSet));
    }

    #[test]
    fn test_non_numeric_interval_rejected() {
        let err = Config::validate(settings("key", "six", "left-pad")).unwrap_err();
        assert!(matches!(err, ConfigError::BadInterval(_)));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = Config::validate(settings("key", "0", "left-pad")).unwrap_err();
        assert!(matches!(err, ConfigError::BadInterval(_)));
    }

    #[test]
    fn test_missing_target_rejected() {
        let err = Config::validate(settings("key", "12", "")).unwrap_err();
        assert!(matches!(err, ConfigError::TargetNotSet));
    }
}
