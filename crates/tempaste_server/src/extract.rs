//! Strict JSON body extractor.

use crate::{error::HttpError, AppState};
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
    http::{header, StatusCode},
};
use serde::de::DeserializeOwned;
use tempaste_core::{check_content_type, decode_json_body, DecodeError};

/// Request body decoded with [`decode_json_body`].
///
/// The `Content-Type` header is checked before the body is read. Bodies
/// over the configured limit are rejected while buffering.
#[derive(Debug)]
pub struct StrictJson<T>(pub T);

#[async_trait]
impl<T: DeserializeOwned> FromRequest<AppState> for StrictJson<T> {
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let limit = state.config.max_body_bytes;
        let content_type = match req.headers().get(header::CONTENT_TYPE) {
            Some(value) => Some(
                value
                    .to_str()
                    .map_err(|_| DecodeError::UnsupportedMediaType)?
                    .to_string(),
            ),
            None => None,
        };
        check_content_type(content_type.as_deref())?;

        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                DecodeError::TooLarge { limit }
            } else {
                tracing::debug!("Failed to buffer request body: {}", rejection.body_text());
                DecodeError::Truncated
            }
        })?;

        Ok(Self(decode_json_body(content_type.as_deref(), &body, limit)?))
    }
}
