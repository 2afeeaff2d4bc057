use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::errors::AppError;
use crate::models::require;

/// Lifecycle of the enrichment workflow, stored as TEXT on the company row.
/// `pending` until the first enrichment is triggered; re-enrichment of a
/// `completed` or `failed` company is allowed and re-enters `processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl EnrichmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentStatus::Pending => "pending",
            EnrichmentStatus::Processing => "processing",
            EnrichmentStatus::Completed => "completed",
            EnrichmentStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub website: String,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub score: i32,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub summary: Option<String>,
    pub what_they_do: Option<Vec<String>>,
    pub keywords: Option<Vec<String>>,
    pub derived_signals: Option<Vec<String>>,
    pub enrichment_status: String,
    pub last_enriched_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated company creation payload. Enrichment-derived fields are never
/// client-writable; they start unset and are only touched by the enricher.
#[derive(Debug, Clone)]
pub struct NewCompany {
    pub name: String,
    pub website: String,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub score: Option<i32>,
}

/// Raw `POST /api/companies` body before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: Option<String>,
    pub website: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub score: Option<i32>,
}

impl CreateCompanyRequest {
    pub fn validate(self) -> Result<NewCompany, AppError> {
        Ok(NewCompany {
            name: require("name", self.name)?,
            website: require("website", self.website)?,
            sector: self.sector,
            stage: self.stage,
            location: self.location,
            description: self.description,
            logo_url: self.logo_url,
            score: self.score,
        })
    }
}

/// Partial merge for `PUT /api/companies/:id`. Absent fields keep their
/// current value; present fields overwrite. A field cannot be nulled out.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyPatch {
    pub name: Option<String>,
    pub website: Option<String>,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub logo_url: Option<String>,
    pub score: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_requires_name() {
        let req = CreateCompanyRequest {
            name: None,
            website: Some("https://acme.com".into()),
            sector: None,
            stage: None,
            location: None,
            description: None,
            logo_url: None,
            score: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn test_create_request_requires_website() {
        let req = CreateCompanyRequest {
            name: Some("Acme".into()),
            website: Some("".into()),
            sector: None,
            stage: None,
            location: None,
            description: None,
            logo_url: None,
            score: None,
        };
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("website is required"));
    }

    #[test]
    fn test_create_request_passes_optionals_through() {
        let req = CreateCompanyRequest {
            name: Some("Acme".into()),
            website: Some("https://acme.com".into()),
            sector: Some("B2B SaaS".into()),
            stage: None,
            location: None,
            description: None,
            logo_url: None,
            score: Some(85),
        };
        let data = req.validate().unwrap();
        assert_eq!(data.sector.as_deref(), Some("B2B SaaS"));
        assert_eq!(data.score, Some(85));
    }
}
