use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::require;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership row joining a list and a company. The (list, company) pair is
/// unique; adding a duplicate returns the existing row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: i32,
    pub list_id: i32,
    pub company_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CreateListRequest {
    pub fn validate(self) -> Result<NewList, AppError> {
        Ok(NewList {
            name: require("name", self.name)?,
            description: self.description,
        })
    }
}

/// `POST /api/lists/:id/items` body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddListItemRequest {
    pub company_id: Option<i32>,
}
