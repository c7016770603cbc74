//! Shared constants used across tempaste crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default cap on request body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Lifetime applied when a request does not pick one.
pub const DEFAULT_EXPIRY_DAYS: i64 = 14;
/// Shortest lifetime a client may request.
pub const MIN_EXPIRY_DAYS: i64 = 1;
/// Longest lifetime a client may request.
pub const MAX_EXPIRY_DAYS: i64 = 30;
/// Upper bound accepted for a configured `MAX_EXPIRY_DAYS` (about a century).
pub const MAX_CONFIGURABLE_EXPIRY_DAYS: i64 = 36_500;

/// Length of server-generated access keys.
pub const ACCESS_KEY_LEN: usize = 25;

/// Alphabet access keys are drawn from.
pub const ACCESS_KEY_ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// File type stored when the client does not supply one.
pub const DEFAULT_FILE_TYPE: &str = "plaintext";

/// Default interval between expired-paste sweeps, in seconds.
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 3600;

/// Default per-request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
