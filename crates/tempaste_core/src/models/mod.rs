//! Data models for API requests, responses and persistence.

/// Paste entity, request bodies and response shapes.
pub mod paste;

#[cfg(test)]
mod tests;
