use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, CreateCompanyRequest};
use crate::state::AppState;
use crate::storage::CompanyFilters;

/// GET /api/companies
pub async fn handle_list(
    State(state): State<AppState>,
    Query(filters): Query<CompanyFilters>,
) -> Result<Json<Vec<Company>>, AppError> {
    Ok(Json(state.storage.list_companies(&filters).await?))
}

/// GET /api/companies/:id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .storage
        .get_company(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}

/// POST /api/companies
pub async fn handle_create(
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    let data = req.validate()?;
    let company = state.storage.create_company(&data).await?;
    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /api/companies/:id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(patch): Json<CompanyPatch>,
) -> Result<Json<Company>, AppError> {
    let company = state
        .storage
        .update_company(id, &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    Ok(Json(company))
}

/// DELETE /api/companies/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    if !state.storage.delete_company(id).await? {
        return Err(AppError::NotFound("Company not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/companies/:id/enrich
pub async fn handle_enrich(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Company>, AppError> {
    Ok(Json(state.enricher.enrich(id).await?))
}
