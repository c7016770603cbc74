//! Shared test-only helpers for tempaste_core.

use crate::config::LifecycleConfig;
use crate::lifecycle::{ManualClock, PasteLifecycle};
use crate::models::paste::Paste;
use crate::Database;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tempfile::TempDir;

/// Lifecycle type used by service tests: seeded RNG and a shared manual clock.
pub(crate) type TestLifecycle = PasteLifecycle<StdRng, Arc<ManualClock>>;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::open(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

pub(crate) fn test_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap()
}

/// Lifecycle with a deterministic seed whose clock the test can advance.
pub(crate) fn manual_lifecycle(seed: u64) -> (TestLifecycle, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(test_start()));
    let lifecycle =
        PasteLifecycle::with_parts(LifecycleConfig::default(), StdRng::seed_from_u64(seed), clock.clone());
    (lifecycle, clock)
}

/// A stored-row fixture expiring `days` after [`test_start`].
pub(crate) fn paste_fixture(id: &str, days: i64) -> Paste {
    Paste {
        id: id.to_string(),
        content: vec![format!("body of {}", id)],
        name: None,
        file_type: "plaintext".to_string(),
        expires_at: test_start() + Duration::days(days),
        access_key: format!("key{}", id.replace('-', "")),
    }
}
