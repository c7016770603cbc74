//! Core domain library for tempaste (config, decoding, lifecycle, storage).

/// Access key checks.
pub mod auth;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Strict JSON request body decoding.
pub mod decode;
/// Database access layer.
pub mod db;
/// Scoped environment overrides for env-driven tests.
pub mod env;
/// Application error types.
pub mod error;
/// Paste construction and edit rules.
pub mod lifecycle;
/// Data models for API requests, responses and persistence.
pub mod models;
/// Request-level paste operations.
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, ConfigError, LifecycleConfig};
pub use constants::DEFAULT_PORT;
pub use db::{Database, PasteStore, WriteOutcome};
pub use decode::{check_content_type, decode_json_body, DecodeError};
pub use error::AppError;
pub use lifecycle::PasteLifecycle;
pub use service::PasteService;
