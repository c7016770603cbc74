//! Configuration loading from environment variables.

use crate::constants::{
    ACCESS_KEY_LEN, DEFAULT_EXPIRY_DAYS, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT,
    DEFAULT_PURGE_INTERVAL_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_CONFIGURABLE_EXPIRY_DAYS,
    MAX_EXPIRY_DAYS, MIN_EXPIRY_DAYS,
};
use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Runtime configuration for tempaste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    pub max_body_bytes: usize,
    pub default_expiry_days: i64,
    pub min_expiry_days: i64,
    pub max_expiry_days: i64,
    /// Seconds between expired-paste sweeps; `0` disables sweeping.
    pub purge_interval_secs: u64,
    pub request_timeout_secs: u64,
    pub log_file: Option<String>,
    pub log_json: bool,
    pub verbose: bool,
}

/// Settings consumed by [`crate::lifecycle::PasteLifecycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleConfig {
    pub default_expiry_days: i64,
    pub expiry_range: RangeInclusive<i64>,
    pub access_key_len: usize,
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("expiry range {min}..={max} days is empty or starts below one day")]
    InvalidExpiryRange { min: i64, max: i64 },

    #[error("maximum expiry of {max} days exceeds the {limit} day limit")]
    ExpiryRangeTooLong { max: i64, limit: i64 },

    #[error("default expiry of {default} days is outside {min}..={max}")]
    DefaultOutsideRange { default: i64, min: i64, max: i64 },

    #[error("request body limit must be greater than zero")]
    ZeroBodyLimit,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            default_expiry_days: DEFAULT_EXPIRY_DAYS,
            expiry_range: MIN_EXPIRY_DAYS..=MAX_EXPIRY_DAYS,
            access_key_len: ACCESS_KEY_LEN,
        }
    }
}

impl From<&Config> for LifecycleConfig {
    fn from(value: &Config) -> Self {
        Self {
            default_expiry_days: value.default_expiry_days,
            expiry_range: value.min_expiry_days..=value.max_expiry_days,
            access_key_len: ACCESS_KEY_LEN,
        }
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = resolve_home_dir() {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir() -> Option<PathBuf> {
    if let Ok(home) = env::var("HOME") {
        if !home.trim().is_empty() {
            return Some(PathBuf::from(home));
        }
    }

    if let Ok(profile) = env::var("USERPROFILE") {
        if !profile.trim().is_empty() {
            return Some(PathBuf::from(profile));
        }
    }

    std::env::current_dir().ok()
}

fn default_db_path() -> String {
    let home = resolve_home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".cache")
        .join("tempaste")
        .join("db")
        .to_string_lossy()
        .to_string()
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a boolean flag from the environment.
///
/// Missing or unrecognized values are treated as `false`.
pub fn env_flag_enabled(name: &str) -> bool {
    env::var(name)
        .ok()
        .and_then(|value| parse_env_flag(&value))
        .unwrap_or(false)
}

fn env_parse_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing
    /// or unparsable.
    pub fn from_env() -> Self {
        Self {
            db_path: env::var("DB_PATH")
                .map(expand_tilde)
                .unwrap_or_else(|_| default_db_path()),
            port: env_parse_or("PORT", DEFAULT_PORT),
            max_body_bytes: env_parse_or("MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES),
            default_expiry_days: env_parse_or("DEFAULT_EXPIRY_DAYS", DEFAULT_EXPIRY_DAYS),
            min_expiry_days: env_parse_or("MIN_EXPIRY_DAYS", MIN_EXPIRY_DAYS),
            max_expiry_days: env_parse_or("MAX_EXPIRY_DAYS", MAX_EXPIRY_DAYS),
            purge_interval_secs: env_parse_or("PURGE_INTERVAL_SECS", DEFAULT_PURGE_INTERVAL_SECS),
            request_timeout_secs: env_parse_or(
                "REQUEST_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            log_file: env::var("LOG_FILE")
                .ok()
                .filter(|value| !value.trim().is_empty()),
            log_json: env_flag_enabled("LOG_JSON"),
            verbose: env_flag_enabled("VERBOSE"),
        }
    }

    /// Check cross-field constraints.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] describing the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::ZeroBodyLimit);
        }
        if self.min_expiry_days < 1 || self.min_expiry_days > self.max_expiry_days {
            return Err(ConfigError::InvalidExpiryRange {
                min: self.min_expiry_days,
                max: self.max_expiry_days,
            });
        }
        if self.max_expiry_days > MAX_CONFIGURABLE_EXPIRY_DAYS {
            return Err(ConfigError::ExpiryRangeTooLong {
                max: self.max_expiry_days,
                limit: MAX_CONFIGURABLE_EXPIRY_DAYS,
            });
        }
        if !(self.min_expiry_days..=self.max_expiry_days).contains(&self.default_expiry_days) {
            return Err(ConfigError::DefaultOutsideRange {
                default: self.default_expiry_days,
                min: self.min_expiry_days,
                max: self.max_expiry_days,
            });
        }
        Ok(())
    }

    /// Lifecycle settings derived from this configuration.
    pub fn lifecycle(&self) -> LifecycleConfig {
        LifecycleConfig::from(self)
    }

    /// Interval for the expired-paste sweeper, or `None` when disabled.
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval_secs > 0).then(|| Duration::from_secs(self.purge_interval_secs))
    }

    /// Per-request timeout applied by the HTTP layer.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
