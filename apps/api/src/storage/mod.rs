pub mod mem;
pub mod pg;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, NewCompany};
use crate::models::list::{List, ListItem, NewList};
use crate::models::note::Note;
use crate::models::saved_search::{NewSavedSearch, SavedSearch};

/// Optional company listing filters. All present filters combine with AND;
/// `search` matches name, description, or sector case-insensitively as a
/// substring. Also the query-string shape of `GET /api/companies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyFilters {
    pub search: Option<String>,
    pub sector: Option<String>,
    pub stage: Option<String>,
    pub location: Option<String>,
}

/// Outcome of trying to claim a company for enrichment. The claim is a
/// compare-and-swap on `enrichment_status`: it only succeeds from a
/// non-`processing` state, so two concurrent enrichments cannot both run.
pub enum EnrichmentClaim {
    /// Status flipped to `processing`; the claimed row is returned.
    Claimed(Company),
    /// A prior enrichment still holds `processing`.
    InFlight,
    /// No company with that id.
    NotFound,
}

/// The five model-derived fields plus the completion timestamp, written
/// back atomically when an enrichment succeeds.
#[derive(Debug, Clone)]
pub struct EnrichmentUpdate {
    pub summary: String,
    pub what_they_do: Vec<String>,
    pub keywords: Vec<String>,
    pub derived_signals: Vec<String>,
    pub score: i32,
    pub enriched_at: DateTime<Utc>,
}

/// One method per entity operation; no business rules. Missing rows are
/// signalled through `Option`/`bool`, never as errors, so callers decide
/// the HTTP mapping.
#[async_trait]
pub trait Storage: Send + Sync {
    // Companies
    async fn list_companies(&self, filters: &CompanyFilters) -> Result<Vec<Company>, AppError>;
    async fn get_company(&self, id: i32) -> Result<Option<Company>, AppError>;
    async fn create_company(&self, data: &NewCompany) -> Result<Company, AppError>;
    async fn update_company(
        &self,
        id: i32,
        patch: &CompanyPatch,
    ) -> Result<Option<Company>, AppError>;
    /// Deletes the company and cascades to its notes and list items.
    async fn delete_company(&self, id: i32) -> Result<bool, AppError>;

    // Enrichment state writes
    async fn claim_enrichment(&self, id: i32) -> Result<EnrichmentClaim, AppError>;
    async fn complete_enrichment(
        &self,
        id: i32,
        update: &EnrichmentUpdate,
    ) -> Result<Option<Company>, AppError>;
    async fn fail_enrichment(&self, id: i32) -> Result<(), AppError>;

    // Notes
    async fn list_notes(&self, company_id: i32) -> Result<Vec<Note>, AppError>;
    async fn create_note(&self, company_id: i32, content: &str) -> Result<Note, AppError>;

    // Lists
    async fn list_lists(&self) -> Result<Vec<List>, AppError>;
    async fn get_list(&self, id: i32) -> Result<Option<List>, AppError>;
    async fn create_list(&self, data: &NewList) -> Result<List, AppError>;
    /// Deletes the list and cascades to its items.
    async fn delete_list(&self, id: i32) -> Result<bool, AppError>;

    // List items
    async fn get_list_items(&self, list_id: i32) -> Result<Vec<ListItem>, AppError>;
    /// Resolves a list's items to full company records, dropping any item
    /// whose company no longer exists.
    async fn get_list_with_items(&self, id: i32)
        -> Result<Option<(List, Vec<Company>)>, AppError>;
    /// Duplicate (list, company) pairs are a no-op returning the existing row.
    async fn add_list_item(&self, list_id: i32, company_id: i32) -> Result<ListItem, AppError>;
    async fn remove_list_item(&self, list_id: i32, company_id: i32) -> Result<bool, AppError>;

    // Saved searches
    async fn list_saved_searches(&self) -> Result<Vec<SavedSearch>, AppError>;
    async fn create_saved_search(&self, data: &NewSavedSearch) -> Result<SavedSearch, AppError>;
    async fn delete_saved_search(&self, id: i32) -> Result<bool, AppError>;
}
