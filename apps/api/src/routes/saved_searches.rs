use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::saved_search::{CreateSavedSearchRequest, SavedSearch};
use crate::state::AppState;

/// GET /api/saved-searches
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<SavedSearch>>, AppError> {
    Ok(Json(state.storage.list_saved_searches().await?))
}

/// POST /api/saved-searches
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateSavedSearchRequest>,
) -> Result<(StatusCode, Json<SavedSearch>), AppError> {
    let data = req.validate()?;
    let search = state.storage.create_saved_search(&data).await?;
    Ok((StatusCode::CREATED, Json(search)))
}

/// DELETE /api/saved-searches/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.storage.delete_saved_search(id).await? {
        return Err(AppError::NotFound("Saved search not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
