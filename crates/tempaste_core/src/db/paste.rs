//! Paste storage operations backed by redb.

use super::{PasteStore, WriteOutcome};
use crate::db::tables::{PASTES, PASTES_BY_EXPIRY};
use crate::error::AppError;
use crate::models::paste::{KeyProjection, Paste, PasteView};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata, Table};
use std::sync::Arc;

/// Accessor for paste-related redb tables.
pub struct PasteDb {
    db: Arc<redb::Database>,
}

impl PasteDb {
    /// Initialize paste tables if they do not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.open_table(PASTES_BY_EXPIRY)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Number of stored rows, expired or not.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        Ok(pastes.len()?)
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}

impl PasteStore for PasteDb {
    fn insert(&self, paste: &Paste) -> Result<(), AppError> {
        let encoded = bincode::serialize(paste)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            if pastes.get(paste.id.as_str())?.is_some() {
                return Err(AppError::StorageMessage(format!(
                    "Paste id '{}' already exists",
                    paste.id
                )));
            }

            pastes.insert(paste.id.as_str(), encoded.as_slice())?;
            by_expiry.insert((expiry_key(paste.expires_at), paste.id.as_str()), ())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn fetch(&self, id: &str) -> Result<Option<Paste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        match pastes.get(id)? {
            Some(value) => Ok(Some(deserialize_paste(value.value())?)),
            None => Ok(None),
        }
    }

    fn fetch_view(&self, id: &str) -> Result<Option<PasteView>, AppError> {
        Ok(self.fetch(id)?.map(|paste| paste.view()))
    }

    fn fetch_access_key(&self, id: &str) -> Result<Option<KeyProjection>, AppError> {
        Ok(self.fetch(id)?.map(|paste| paste.key_projection()))
    }

    fn replace_if_unchanged(
        &self,
        expected: &Paste,
        updated: &Paste,
    ) -> Result<WriteOutcome, AppError> {
        if expected.id != updated.id {
            return Err(AppError::StorageMessage(format!(
                "Cannot replace paste '{}' with a row for '{}'",
                expected.id, updated.id
            )));
        }
        let id = expected.id.as_str();
        let encoded = bincode::serialize(updated)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let Some(current_guard) = pastes.get(id)? else {
                return Ok(WriteOutcome::Missing);
            };
            let current = deserialize_paste(current_guard.value())?;
            drop(current_guard);
            if current != *expected {
                return Ok(WriteOutcome::Conflict);
            }

            pastes.insert(id, encoded.as_slice())?;
            let old_key = expiry_key(current.expires_at);
            let new_key = expiry_key(updated.expires_at);
            if old_key != new_key {
                remove_expiry_entry(&mut by_expiry, old_key, id)?;
            }
            by_expiry.insert((new_key, id), ())?;
        }
        write_txn.commit()?;
        Ok(WriteOutcome::Applied)
    }

    fn delete_if_key_matches(&self, id: &str, access_key: &str) -> Result<WriteOutcome, AppError> {
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let Some(current_guard) = pastes.get(id)? else {
                return Ok(WriteOutcome::Missing);
            };
            let current = deserialize_paste(current_guard.value())?;
            drop(current_guard);
            if current.access_key != access_key {
                return Ok(WriteOutcome::Conflict);
            }

            remove_expiry_entry(&mut by_expiry, expiry_key(current.expires_at), id)?;
            pastes.remove(id)?;
        }
        write_txn.commit()?;
        Ok(WriteOutcome::Applied)
    }

    /// Rows whose expiry falls in a millisecond strictly before `now` are
    /// removed; anything closer is left for the next sweep.
    fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let cutoff = expiry_key(now);
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let mut by_expiry = write_txn.open_table(PASTES_BY_EXPIRY)?;

            let mut expired = Vec::new();
            for entry in by_expiry.iter()? {
                let (key, _) = entry?;
                let (millis, id) = key.value();
                if millis >= cutoff {
                    break;
                }
                expired.push((millis, id.to_string()));
            }

            let mut removed = 0;
            for (millis, id) in &expired {
                by_expiry.remove((*millis, id.as_str()))?;
                if pastes.remove(id.as_str())?.is_some() {
                    removed += 1;
                } else {
                    tracing::warn!("Expiry index pointed at missing paste {}", id);
                }
            }
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Drop one expiry index entry, noting drift when it was already gone.
fn remove_expiry_entry(
    by_expiry: &mut Table<'_, (u64, &'static str), ()>,
    millis: u64,
    id: &str,
) -> Result<(), AppError> {
    if by_expiry.remove((millis, id))?.is_none() {
        tracing::warn!("Expiry index entry for paste {} was missing", id);
    }
    Ok(())
}

fn expiry_key(expires_at: DateTime<Utc>) -> u64 {
    // Pre-epoch timestamps clamp to zero so they sort first.
    expires_at.timestamp_millis().max(0) as u64
}
