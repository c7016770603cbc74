//! Persistence layer for pastes.

pub mod paste;
pub mod tables;


pub use paste::PasteDb;

use crate::error::AppError;
use crate::models::paste::{KeyProjection, Paste, PasteView};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tables::REDB_FILE_NAME;

/// Result of a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The write committed.
    Applied,
    /// No row exists for the id.
    Missing,
    /// The row changed since it was read; nothing was written.
    Conflict,
}

/// Storage operations the paste service depends on.
///
/// Edits and deletes are conditional: each compares the stored row against
/// what the caller read earlier, inside the same write transaction that
/// applies the change.
pub trait PasteStore: Send + Sync {
    /// Insert a new row. Fails if the id is already taken.
    fn insert(&self, paste: &Paste) -> Result<(), AppError>;

    fn fetch(&self, id: &str) -> Result<Option<Paste>, AppError>;

    /// Display projection of a row.
    fn fetch_view(&self, id: &str) -> Result<Option<PasteView>, AppError>;

    /// Key projection of a row.
    fn fetch_access_key(&self, id: &str) -> Result<Option<KeyProjection>, AppError>;

    /// Replace `expected` with `updated` only if the stored row still equals
    /// `expected`.
    fn replace_if_unchanged(&self, expected: &Paste, updated: &Paste)
        -> Result<WriteOutcome, AppError>;

    /// Delete the row for `id` only if its stored key is still `access_key`.
    fn delete_if_key_matches(&self, id: &str, access_key: &str) -> Result<WriteOutcome, AppError>;

    /// Remove rows that expired before `now`, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError>;
}

/// Database handle owning the redb instance and its table accessors.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: Arc<PasteDb>,
}

impl Database {
    /// Open (or create) the database stored under directory `path`.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, another process
    /// holds the database, or table initialization fails.
    pub fn open(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let db = match redb::Database::create(dir.join(REDB_FILE_NAME)) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database at '{}' is already open in another tempaste process.\n\
                     Stop it first, or set DB_PATH to use a different location.",
                    dir.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        Ok(Self {
            pastes: Arc::new(PasteDb::new(db.clone())?),
            db,
        })
    }

    /// Paste storage as a trait object for the service layer.
    pub fn store(&self) -> Arc<dyn PasteStore> {
        self.pastes.clone()
    }
}
