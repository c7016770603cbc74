//! Access key checks for edit and delete.

use crate::error::AppError;

/// Permit an operation only when `supplied` equals the stored key.
///
/// `stored` must be the key as last persisted, never one already rotated by
/// a pending edit.
///
/// # Errors
/// [`AppError::Unauthorized`] when `supplied` is absent or differs.
pub fn authorize(supplied: Option<&str>, stored: &str) -> Result<(), AppError> {
    match supplied {
        Some(supplied) if keys_match(supplied.as_bytes(), stored.as_bytes()) => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

// Examines every byte regardless of where the first difference is.
fn keys_match(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    left.iter()
        .zip(right)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}
