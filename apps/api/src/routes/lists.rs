use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::company::Company;
use crate::models::list::{AddListItemRequest, CreateListRequest, List, ListItem};
use crate::state::AppState;

/// `GET /api/lists/:id` response: the list plus its items resolved to full
/// company records.
#[derive(Serialize)]
pub struct ListDetailResponse {
    pub list: List,
    pub items: Vec<Company>,
}

/// GET /api/lists
pub async fn handle_list(State(state): State<AppState>) -> Result<Json<Vec<List>>, AppError> {
    Ok(Json(state.storage.list_lists().await?))
}

/// POST /api/lists
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<List>), AppError> {
    let data = req.validate()?;
    let list = state.storage.create_list(&data).await?;
    Ok((StatusCode::CREATED, Json(list)))
}

/// GET /api/lists/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ListDetailResponse>, AppError> {
    let (list, items) = state
        .storage
        .get_list_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound("List not found".to_string()))?;
    Ok(Json(ListDetailResponse { list, items }))
}

/// DELETE /api/lists/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.storage.delete_list(id).await? {
        return Err(AppError::NotFound("List not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/lists/:id/items
pub async fn handle_add_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<AddListItemRequest>,
) -> Result<(StatusCode, Json<ListItem>), AppError> {
    let company_id = req
        .company_id
        .ok_or_else(|| AppError::Validation("companyId is required".to_string()))?;
    if state.storage.get_list(id).await?.is_none() {
        return Err(AppError::NotFound("List not found".to_string()));
    }
    if state.storage.get_company(company_id).await?.is_none() {
        return Err(AppError::NotFound("Company not found".to_string()));
    }
    let item = state.storage.add_list_item(id, company_id).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// DELETE /api/lists/:id/items/:company_id
pub async fn handle_remove_item(
    State(state): State<AppState>,
    Path((id, company_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    if !state.storage.remove_list_item(id, company_id).await? {
        return Err(AppError::NotFound("List item not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
