//! HTTP error mapping for API handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tempaste_core::{AppError, DecodeError};

/// Client-facing message for storage failures.
const INTERNAL_MESSAGE: &str = "Internal server error";

/// HTTP-layer wrapper for core [`AppError`] values.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl From<DecodeError> for HttpError {
    fn from(value: DecodeError) -> Self {
        Self(AppError::Decode(value))
    }
}

/// Status code an error is surfaced with.
///
/// Missing and expired pastes answer `400`, not `404`.
pub fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::Decode(DecodeError::UnsupportedMediaType) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        AppError::Decode(DecodeError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
        AppError::Decode(_) | AppError::Validation(_) | AppError::NotFound => {
            StatusCode::BAD_REQUEST
        }
        AppError::Unauthorized => StatusCode::UNAUTHORIZED,
        AppError::Conflict(_) => StatusCode::CONFLICT,
        AppError::Database(_)
        | AppError::StorageMessage(_)
        | AppError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let message = if self.0.is_persistence() {
            tracing::error!("Storage failure: {}", self.0);
            INTERNAL_MESSAGE.to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_matrix() {
        let cases = [
            (
                AppError::Decode(DecodeError::UnsupportedMediaType),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                AppError::Decode(DecodeError::TooLarge { limit: 10 }),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (AppError::Decode(DecodeError::Empty), StatusCode::BAD_REQUEST),
            (
                AppError::Decode(DecodeError::UnknownField("x".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::validation("No updates given"), StatusCode::BAD_REQUEST),
            (AppError::NotFound, StatusCode::BAD_REQUEST),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::Conflict("changed".to_string()), StatusCode::CONFLICT),
            (
                AppError::StorageMessage("disk".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(status_for(&err), expected, "{:?}", err);
        }
    }

    #[test]
    fn storage_details_stay_out_of_the_response() {
        let response =
            HttpError(AppError::StorageMessage("/secret/path unreadable".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
