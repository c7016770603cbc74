//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use std::path::Path;
use tempaste_server::{create_app, AppState, Config, Database};
use tempfile::TempDir;

/// Body limit used by test servers; small enough to trip on purpose.
pub(crate) const TEST_BODY_LIMIT: usize = 4096;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        db_path: db_path.to_str().expect("db path").to_string(),
        port: 0,
        max_body_bytes: TEST_BODY_LIMIT,
        default_expiry_days: 14,
        min_expiry_days: 1,
        max_expiry_days: 30,
        purge_interval_secs: 0,
        request_timeout_secs: 15,
        log_file: None,
        log_json: false,
        verbose: false,
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::open(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, &db);
    TestServer::new(create_app(state)).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let server = test_server_for_config(test_config_for_db_path(&db_path));
    (server, temp_dir)
}
