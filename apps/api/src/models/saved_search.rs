use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::require;

/// A persisted, named filter configuration. The `filters` payload is opaque
/// to the server and interpreted only by the client.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: i32,
    pub name: String,
    pub filters: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSavedSearch {
    pub name: String,
    pub filters: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSavedSearchRequest {
    pub name: Option<String>,
    pub filters: Option<Value>,
}

impl CreateSavedSearchRequest {
    pub fn validate(self) -> Result<NewSavedSearch, AppError> {
        Ok(NewSavedSearch {
            name: require("name", self.name)?,
            filters: self
                .filters
                .ok_or_else(|| AppError::Validation("filters is required".to_string()))?,
        })
    }
}
