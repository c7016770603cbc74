//! Paste construction and mutation rules.
//!
//! [`PasteLifecycle`] turns request bodies into paste rows. It never touches
//! storage and never checks access keys; callers fetch, authorize and persist
//! around it.

mod access_key;
mod clock;

pub use access_key::{generate_access_key, is_valid_access_key};
pub use clock::{Clock, ManualClock, SystemClock};

use crate::config::LifecycleConfig;
use crate::constants::DEFAULT_FILE_TYPE;
use crate::error::AppError;
use crate::models::paste::{CreatePasteRequest, EditPasteRequest, Paste};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use std::sync::{Mutex, PoisonError};
use uuid::{Builder, Uuid};

/// Builds new pastes and applies edits to existing ones.
///
/// The random source is seeded once and shared behind a mutex, so rapid
/// consecutive calls never reuse a seed.
pub struct PasteLifecycle<R = StdRng, C = SystemClock> {
    config: LifecycleConfig,
    rng: Mutex<R>,
    clock: C,
}

impl PasteLifecycle {
    /// Lifecycle backed by an entropy-seeded [`StdRng`] and the system clock.
    pub fn new(config: LifecycleConfig) -> Self {
        Self::with_parts(config, StdRng::from_entropy(), SystemClock)
    }
}

impl<R: RngCore, C: Clock> PasteLifecycle<R, C> {
    /// Lifecycle with an explicit random source and clock.
    pub fn with_parts(config: LifecycleConfig, rng: R, clock: C) -> Self {
        Self {
            config,
            rng: Mutex::new(rng),
            clock,
        }
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Build a new paste from a create request.
    ///
    /// Any `id` or `accessKey` in the request is ignored; both are generated.
    /// An `expiresIn` outside the configured range falls back to the default.
    ///
    /// # Errors
    /// [`AppError::Validation`] when `content` is missing or empty.
    pub fn create(&self, request: &CreatePasteRequest) -> Result<Paste, AppError> {
        let content = match request.content.as_ref() {
            Some(lines) if !lines.is_empty() => lines.clone(),
            _ => return Err(AppError::validation("Content field empty")),
        };

        let days = request
            .expires_in
            .filter(|days| self.config.expiry_range.contains(days))
            .unwrap_or(self.config.default_expiry_days);

        Ok(Paste {
            id: self.generate_id().to_string(),
            content,
            name: non_blank(request.name.as_deref()),
            file_type: non_blank(request.file_type.as_deref())
                .unwrap_or_else(|| DEFAULT_FILE_TYPE.to_string()),
            expires_at: self.expires_at_for(days)?,
            access_key: self.generate_access_key(),
        })
    }

    /// Apply an edit request to `existing`, returning the updated row.
    ///
    /// Every field present in the request is compared with the stored value
    /// before anything is merged, so repeating a current value fails even if
    /// another field changes. A successful edit always restarts the expiry
    /// window from now.
    ///
    /// # Errors
    /// [`AppError::Validation`] when the request carries no updates, repeats
    /// a stored value, sends empty content, names an expiry outside the
    /// configured range or supplies a malformed `newAccessKey`.
    pub fn edit(&self, existing: &Paste, request: &EditPasteRequest) -> Result<Paste, AppError> {
        let content = request.content.as_ref();
        let name = non_blank(request.name.as_deref());
        let file_type = non_blank(request.file_type.as_deref());
        let new_access_key = request.new_access_key.as_deref().filter(|key| !key.is_empty());
        let expires_in = request.expires_in.filter(|days| *days != 0);

        if content.is_none()
            && name.is_none()
            && file_type.is_none()
            && new_access_key.is_none()
            && expires_in.is_none()
        {
            return Err(AppError::validation("No updates given"));
        }

        if let Some(lines) = content {
            if lines.is_empty() {
                return Err(AppError::validation("Content field empty"));
            }
            if *lines == existing.content {
                return Err(no_changes("content"));
            }
        }
        if name.is_some() && name == existing.name {
            return Err(no_changes("name"));
        }
        if let Some(file_type) = &file_type {
            if *file_type == existing.file_type {
                return Err(no_changes("fileType"));
            }
        }
        if let Some(key) = new_access_key {
            if !is_valid_access_key(key) {
                return Err(AppError::validation(
                    "newAccessKey must only contain ASCII letters and digits",
                ));
            }
            if key == existing.access_key {
                return Err(no_changes("accessKey"));
            }
        }

        let days = match expires_in {
            Some(days) if !self.config.expiry_range.contains(&days) => {
                return Err(AppError::validation("Expiration time outside valid range"));
            }
            Some(days) => days,
            None => self.config.default_expiry_days,
        };

        let expires_at = self.expires_at_for(days)?;
        let mut updated = existing.clone();
        if let Some(lines) = content {
            updated.content = lines.clone();
        }
        if name.is_some() {
            updated.name = name;
        }
        if let Some(file_type) = file_type {
            updated.file_type = file_type;
        }
        if let Some(key) = new_access_key {
            updated.access_key = key.to_string();
        }
        updated.expires_at = expires_at;
        Ok(updated)
    }

    /// Absolute expiry `days` days from now.
    ///
    /// # Errors
    /// [`AppError::Validation`] when the result is not representable.
    pub fn expires_at_for(&self, days: i64) -> Result<DateTime<Utc>, AppError> {
        Duration::try_days(days)
            .and_then(|window| self.clock.now().checked_add_signed(window))
            .ok_or_else(|| AppError::validation("Expiration time too far in the future"))
    }

    /// Fresh access key of the configured length.
    pub fn generate_access_key(&self) -> String {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        generate_access_key(&mut *rng, self.config.access_key_len)
    }

    fn generate_id(&self) -> Uuid {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Builder::from_random_bytes(rng.gen()).into_uuid()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.filter(|value| !value.is_empty()).map(str::to_string)
}

fn no_changes(field: &str) -> AppError {
    AppError::validation(format!("No changes made to {} field", field))
}
