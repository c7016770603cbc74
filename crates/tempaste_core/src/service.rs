//! Paste operations composed from storage, lifecycle rules and key checks.

use crate::auth::authorize;
use crate::db::{PasteStore, WriteOutcome};
use crate::error::AppError;
use crate::lifecycle::{Clock, PasteLifecycle, SystemClock};
use crate::models::paste::{
    CreatePasteRequest, CreatedPaste, DeletePasteRequest, EditPasteRequest, EditedPaste, PasteView,
};
use rand::rngs::StdRng;
use rand::RngCore;
use std::sync::Arc;

const CONCURRENT_CHANGE: &str = "Paste was changed by another request; retry";

/// Request-level paste operations.
///
/// Holds the store and the lifecycle as separate collaborators. Every
/// mutation reads the stored row, authorizes against it, and then writes
/// conditionally so a concurrent change between the read and the write
/// surfaces as [`AppError::Conflict`] instead of being overwritten.
pub struct PasteService<R = StdRng, C = SystemClock> {
    store: Arc<dyn PasteStore>,
    lifecycle: Arc<PasteLifecycle<R, C>>,
}

impl<R, C> Clone for PasteService<R, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<R: RngCore, C: Clock> PasteService<R, C> {
    pub fn new(store: Arc<dyn PasteStore>, lifecycle: PasteLifecycle<R, C>) -> Self {
        Self {
            store,
            lifecycle: Arc::new(lifecycle),
        }
    }

    pub fn lifecycle(&self) -> &PasteLifecycle<R, C> {
        &self.lifecycle
    }

    /// Build, persist and acknowledge a new paste.
    ///
    /// # Errors
    /// Validation errors from the lifecycle, or storage failures.
    pub fn create(&self, request: &CreatePasteRequest) -> Result<CreatedPaste, AppError> {
        let paste = self.lifecycle.create(request)?;
        self.store.insert(&paste)?;
        Ok(CreatedPaste::from(&paste))
    }

    /// Display projection of a live paste.
    ///
    /// # Errors
    /// [`AppError::NotFound`] when the paste is missing or expired.
    pub fn get(&self, id: &str) -> Result<PasteView, AppError> {
        let now = self.lifecycle.now();
        match self.store.fetch_view(id)? {
            Some(view) if !view.is_expired(now) => Ok(view),
            _ => Err(AppError::NotFound),
        }
    }

    /// Authorize and apply an edit.
    ///
    /// The key in the request is checked against the key as stored, before
    /// any rotation in the same request takes effect.
    ///
    /// # Errors
    /// [`AppError::NotFound`], [`AppError::Unauthorized`], lifecycle
    /// validation errors, [`AppError::Conflict`] when the row changed after
    /// it was read, or storage failures.
    pub fn edit(&self, id: &str, request: &EditPasteRequest) -> Result<EditedPaste, AppError> {
        let now = self.lifecycle.now();
        let existing = match self.store.fetch(id)? {
            Some(paste) if !paste.is_expired(now) => paste,
            _ => return Err(AppError::NotFound),
        };
        authorize(request.access_key.as_deref(), &existing.access_key)?;

        let updated = self.lifecycle.edit(&existing, request)?;
        match self.store.replace_if_unchanged(&existing, &updated)? {
            WriteOutcome::Applied => Ok(EditedPaste::from(&updated)),
            WriteOutcome::Missing => Err(AppError::NotFound),
            WriteOutcome::Conflict => Err(AppError::Conflict(CONCURRENT_CHANGE.to_string())),
        }
    }

    /// Authorize and delete a paste.
    ///
    /// # Errors
    /// [`AppError::NotFound`], [`AppError::Unauthorized`],
    /// [`AppError::Conflict`] when the key was rotated after it was read, or
    /// storage failures.
    pub fn delete(&self, id: &str, request: &DeletePasteRequest) -> Result<(), AppError> {
        let now = self.lifecycle.now();
        let projection = match self.store.fetch_access_key(id)? {
            Some(projection) if !projection.is_expired(now) => projection,
            _ => return Err(AppError::NotFound),
        };
        authorize(request.access_key.as_deref(), &projection.access_key)?;

        match self.store.delete_if_key_matches(id, &projection.access_key)? {
            WriteOutcome::Applied => Ok(()),
            WriteOutcome::Missing => Err(AppError::NotFound),
            WriteOutcome::Conflict => Err(AppError::Conflict(CONCURRENT_CHANGE.to_string())),
        }
    }

    /// Remove every paste that has expired by now.
    pub fn purge_expired(&self) -> Result<usize, AppError> {
        let removed = self.store.purge_expired(self.lifecycle.now())?;
        if removed > 0 {
            tracing::info!("Purged {} expired paste(s)", removed);
        }
        Ok(removed)
    }
}
