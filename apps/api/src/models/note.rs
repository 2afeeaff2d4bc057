use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::require;

/// Free-text annotation on a company. Notes are immutable once created:
/// there is no update or per-note delete operation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i32,
    pub company_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// `POST /api/companies/:id/notes` body. The company id comes from the path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub content: Option<String>,
}

impl CreateNoteRequest {
    pub fn validate(self) -> Result<String, AppError> {
        require("content", self.content)
    }
}
