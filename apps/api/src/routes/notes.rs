use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::note::{CreateNoteRequest, Note};
use crate::state::AppState;

/// GET /api/companies/:id/notes
pub async fn handle_list(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
) -> Result<Json<Vec<Note>>, AppError> {
    Ok(Json(state.storage.list_notes(company_id).await?))
}

/// POST /api/companies/:id/notes
pub async fn handle_create(
    State(state): State<AppState>,
    Path(company_id): Path<i32>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>), AppError> {
    let content = req.validate()?;
    let note = state.storage.create_note(company_id, &content).await?;
    Ok((StatusCode::CREATED, Json(note)))
}
