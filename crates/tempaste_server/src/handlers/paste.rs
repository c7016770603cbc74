//! Paste HTTP handlers.

use crate::{error::HttpError, extract::StrictJson, models::paste::*, AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// `POST /`: create a paste and return its id, access key and expiry.
pub async fn create_paste(
    State(state): State<AppState>,
    StrictJson(req): StrictJson<CreatePasteRequest>,
) -> Result<(StatusCode, Json<CreatedPaste>), HttpError> {
    let created = state.service.create(&req)?;
    tracing::info!("Created paste {}", created.id);
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /:id`: display projection of a live paste.
pub async fn get_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PasteView>, HttpError> {
    Ok(Json(state.service.get(&id)?))
}

/// `PUT /:id`: apply an authorized edit.
pub async fn edit_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    StrictJson(req): StrictJson<EditPasteRequest>,
) -> Result<Json<EditedPaste>, HttpError> {
    let edited = state.service.edit(&id, &req)?;
    tracing::info!("Edited paste {}", id);
    Ok(Json(edited))
}

/// `DELETE /:id`: remove a paste after checking its access key.
pub async fn delete_paste(
    State(state): State<AppState>,
    Path(id): Path<String>,
    StrictJson(req): StrictJson<DeletePasteRequest>,
) -> Result<StatusCode, HttpError> {
    state.service.delete(&id, &req)?;
    tracing::info!("Deleted paste {}", id);
    Ok(StatusCode::NO_CONTENT)
}
