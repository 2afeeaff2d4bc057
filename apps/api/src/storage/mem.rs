#![allow(dead_code)]

//! In-memory `Storage` backend.
//!
//! Mirrors the Postgres semantics — ordering, cascades, the dedup no-op,
//! the enrichment CAS — behind the same trait, so the enrichment workflow
//! and the handlers can be exercised in unit tests without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, EnrichmentStatus, NewCompany};
use crate::models::list::{List, ListItem, NewList};
use crate::models::note::Note;
use crate::models::saved_search::{NewSavedSearch, SavedSearch};
use crate::storage::{CompanyFilters, EnrichmentClaim, EnrichmentUpdate, Storage};

#[derive(Default)]
struct Inner {
    companies: Vec<Company>,
    notes: Vec<Note>,
    lists: Vec<List>,
    list_items: Vec<ListItem>,
    saved_searches: Vec<SavedSearch>,
    next_company_id: i32,
    next_note_id: i32,
    next_list_id: i32,
    next_item_id: i32,
    next_search_id: i32,
}

#[derive(Default)]
pub struct MemStorage {
    inner: Mutex<Inner>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Test hook: inserts a raw membership row, bypassing the dedup and
    /// existence checks, to manufacture dangling references.
    pub fn insert_raw_list_item(&self, list_id: i32, company_id: i32) {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        inner.next_item_id += 1;
        let item = ListItem {
            id: inner.next_item_id,
            list_id,
            company_id,
            created_at: Utc::now(),
        };
        inner.list_items.push(item);
    }
}

fn matches_filters(company: &Company, filters: &CompanyFilters) -> bool {
    if let Some(search) = &filters.search {
        let needle = search.to_lowercase();
        let contains =
            |field: Option<&str>| field.is_some_and(|s| s.to_lowercase().contains(&needle));
        let hit = company.name.to_lowercase().contains(&needle)
            || contains(company.description.as_deref())
            || contains(company.sector.as_deref());
        if !hit {
            return false;
        }
    }
    if let Some(sector) = &filters.sector {
        if company.sector.as_deref() != Some(sector.as_str()) {
            return false;
        }
    }
    if let Some(stage) = &filters.stage {
        if company.stage.as_deref() != Some(stage.as_str()) {
            return false;
        }
    }
    if let Some(location) = &filters.location {
        if company.location.as_deref() != Some(location.as_str()) {
            return false;
        }
    }
    true
}

#[async_trait]
impl Storage for MemStorage {
    async fn list_companies(&self, filters: &CompanyFilters) -> Result<Vec<Company>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        let mut companies: Vec<Company> = inner
            .companies
            .iter()
            .filter(|c| matches_filters(c, filters))
            .cloned()
            .collect();
        companies.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(companies)
    }

    async fn get_company(&self, id: i32) -> Result<Option<Company>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        Ok(inner.companies.iter().find(|c| c.id == id).cloned())
    }

    async fn create_company(&self, data: &NewCompany) -> Result<Company, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        inner.next_company_id += 1;
        let now = Utc::now();
        let company = Company {
            id: inner.next_company_id,
            name: data.name.clone(),
            website: data.website.clone(),
            sector: data.sector.clone(),
            stage: data.stage.clone(),
            location: data.location.clone(),
            score: data.score.unwrap_or(0),
            description: data.description.clone(),
            logo_url: data.logo_url.clone(),
            summary: None,
            what_they_do: None,
            keywords: None,
            derived_signals: None,
            enrichment_status: EnrichmentStatus::Pending.as_str().to_string(),
            last_enriched_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.companies.push(company.clone());
        Ok(company)
    }

    async fn update_company(
        &self,
        id: i32,
        patch: &CompanyPatch,
    ) -> Result<Option<Company>, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let Some(company) = inner.companies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            company.name = name.clone();
        }
        if let Some(website) = &patch.website {
            company.website = website.clone();
        }
        if let Some(sector) = &patch.sector {
            company.sector = Some(sector.clone());
        }
        if let Some(stage) = &patch.stage {
            company.stage = Some(stage.clone());
        }
        if let Some(location) = &patch.location {
            company.location = Some(location.clone());
        }
        if let Some(description) = &patch.description {
            company.description = Some(description.clone());
        }
        if let Some(logo_url) = &patch.logo_url {
            company.logo_url = Some(logo_url.clone());
        }
        if let Some(score) = patch.score {
            company.score = score;
        }
        company.updated_at = Utc::now();
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, id: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let before = inner.companies.len();
        inner.companies.retain(|c| c.id != id);
        if inner.companies.len() == before {
            return Ok(false);
        }
        inner.notes.retain(|n| n.company_id != id);
        inner.list_items.retain(|i| i.company_id != id);
        Ok(true)
    }

    async fn claim_enrichment(&self, id: i32) -> Result<EnrichmentClaim, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let Some(company) = inner.companies.iter_mut().find(|c| c.id == id) else {
            return Ok(EnrichmentClaim::NotFound);
        };
        if company.enrichment_status == EnrichmentStatus::Processing.as_str() {
            return Ok(EnrichmentClaim::InFlight);
        }
        company.enrichment_status = EnrichmentStatus::Processing.as_str().to_string();
        company.updated_at = Utc::now();
        Ok(EnrichmentClaim::Claimed(company.clone()))
    }

    async fn complete_enrichment(
        &self,
        id: i32,
        update: &EnrichmentUpdate,
    ) -> Result<Option<Company>, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let Some(company) = inner.companies.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        company.summary = Some(update.summary.clone());
        company.what_they_do = Some(update.what_they_do.clone());
        company.keywords = Some(update.keywords.clone());
        company.derived_signals = Some(update.derived_signals.clone());
        company.score = update.score;
        company.enrichment_status = EnrichmentStatus::Completed.as_str().to_string();
        company.last_enriched_at = Some(update.enriched_at);
        company.updated_at = Utc::now();
        Ok(Some(company.clone()))
    }

    async fn fail_enrichment(&self, id: i32) -> Result<(), AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        if let Some(company) = inner.companies.iter_mut().find(|c| c.id == id) {
            company.enrichment_status = EnrichmentStatus::Failed.as_str().to_string();
            company.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn list_notes(&self, company_id: i32) -> Result<Vec<Note>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        let mut notes: Vec<Note> = inner
            .notes
            .iter()
            .filter(|n| n.company_id == company_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(notes)
    }

    async fn create_note(&self, company_id: i32, content: &str) -> Result<Note, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        inner.next_note_id += 1;
        let note = Note {
            id: inner.next_note_id,
            company_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        inner.notes.push(note.clone());
        Ok(note)
    }

    async fn list_lists(&self) -> Result<Vec<List>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        let mut lists = inner.lists.clone();
        lists.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(lists)
    }

    async fn get_list(&self, id: i32) -> Result<Option<List>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        Ok(inner.lists.iter().find(|l| l.id == id).cloned())
    }

    async fn create_list(&self, data: &NewList) -> Result<List, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        inner.next_list_id += 1;
        let now = Utc::now();
        let list = List {
            id: inner.next_list_id,
            name: data.name.clone(),
            description: data.description.clone(),
            created_at: now,
            updated_at: now,
        };
        inner.lists.push(list.clone());
        Ok(list)
    }

    async fn delete_list(&self, id: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let before = inner.lists.len();
        inner.lists.retain(|l| l.id != id);
        if inner.lists.len() == before {
            return Ok(false);
        }
        inner.list_items.retain(|i| i.list_id != id);
        Ok(true)
    }

    async fn get_list_items(&self, list_id: i32) -> Result<Vec<ListItem>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        Ok(inner
            .list_items
            .iter()
            .filter(|i| i.list_id == list_id)
            .cloned()
            .collect())
    }

    async fn get_list_with_items(
        &self,
        id: i32,
    ) -> Result<Option<(List, Vec<Company>)>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        let Some(list) = inner.lists.iter().find(|l| l.id == id).cloned() else {
            return Ok(None);
        };
        // Items whose company has been deleted are silently dropped
        let companies = inner
            .list_items
            .iter()
            .filter(|i| i.list_id == id)
            .filter_map(|i| inner.companies.iter().find(|c| c.id == i.company_id))
            .cloned()
            .collect();
        Ok(Some((list, companies)))
    }

    async fn add_list_item(&self, list_id: i32, company_id: i32) -> Result<ListItem, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        if let Some(existing) = inner
            .list_items
            .iter()
            .find(|i| i.list_id == list_id && i.company_id == company_id)
        {
            return Ok(existing.clone());
        }
        inner.next_item_id += 1;
        let item = ListItem {
            id: inner.next_item_id,
            list_id,
            company_id,
            created_at: Utc::now(),
        };
        inner.list_items.push(item.clone());
        Ok(item)
    }

    async fn remove_list_item(&self, list_id: i32, company_id: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let before = inner.list_items.len();
        inner
            .list_items
            .retain(|i| !(i.list_id == list_id && i.company_id == company_id));
        Ok(inner.list_items.len() != before)
    }

    async fn list_saved_searches(&self) -> Result<Vec<SavedSearch>, AppError> {
        let inner = self.inner.lock().expect("storage mutex poisoned");
        let mut searches = inner.saved_searches.clone();
        searches.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(searches)
    }

    async fn create_saved_search(&self, data: &NewSavedSearch) -> Result<SavedSearch, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        inner.next_search_id += 1;
        let search = SavedSearch {
            id: inner.next_search_id,
            name: data.name.clone(),
            filters: data.filters.clone(),
            created_at: Utc::now(),
        };
        inner.saved_searches.push(search.clone());
        Ok(search)
    }

    async fn delete_saved_search(&self, id: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().expect("storage mutex poisoned");
        let before = inner.saved_searches.len();
        inner.saved_searches.retain(|s| s.id != id);
        Ok(inner.saved_searches.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_company(name: &str, sector: Option<&str>, description: Option<&str>) -> NewCompany {
        NewCompany {
            name: name.to_string(),
            website: format!("https://{}.example.com", name.to_lowercase()),
            sector: sector.map(String::from),
            stage: None,
            location: None,
            description: description.map(String::from),
            logo_url: None,
            score: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", None, None))
            .await
            .unwrap();
        assert_eq!(company.score, 0);
        assert_eq!(company.enrichment_status, "pending");
        assert!(company.summary.is_none());
        assert!(company.last_enriched_at.is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let storage = MemStorage::new();
        storage
            .create_company(&new_company("First", None, None))
            .await
            .unwrap();
        storage
            .create_company(&new_company("Second", None, None))
            .await
            .unwrap();
        let companies = storage
            .list_companies(&CompanyFilters::default())
            .await
            .unwrap();
        assert_eq!(companies[0].name, "Second");
        assert_eq!(companies[1].name, "First");
    }

    #[tokio::test]
    async fn test_sector_filter_is_exact() {
        let storage = MemStorage::new();
        storage
            .create_company(&new_company("Globex", Some("Fintech"), None))
            .await
            .unwrap();
        storage
            .create_company(&new_company("Acme", Some("FinOps"), None))
            .await
            .unwrap();
        let filters = CompanyFilters {
            sector: Some("Fintech".to_string()),
            ..Default::default()
        };
        let companies = storage.list_companies(&filters).await.unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Globex");
    }

    #[tokio::test]
    async fn test_search_matches_name_description_sector_case_insensitive() {
        let storage = MemStorage::new();
        storage
            .create_company(&new_company("Globex", None, None))
            .await
            .unwrap();
        storage
            .create_company(&new_company("Acme", None, Some("A global exchange")))
            .await
            .unwrap();
        storage
            .create_company(&new_company("Initech", Some("GlobalTech"), None))
            .await
            .unwrap();
        storage
            .create_company(&new_company("Soylent", Some("FoodTech"), None))
            .await
            .unwrap();
        let filters = CompanyFilters {
            search: Some("GLOB".to_string()),
            ..Default::default()
        };
        let companies = storage.list_companies(&filters).await.unwrap();
        let names: Vec<&str> = companies.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Initech", "Acme", "Globex"]);
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let storage = MemStorage::new();
        storage
            .create_company(&NewCompany {
                stage: Some("Seed".to_string()),
                ..new_company("Globex", Some("Fintech"), None)
            })
            .await
            .unwrap();
        storage
            .create_company(&NewCompany {
                stage: Some("Series A".to_string()),
                ..new_company("Finly", Some("Fintech"), None)
            })
            .await
            .unwrap();
        let filters = CompanyFilters {
            sector: Some("Fintech".to_string()),
            stage: Some("Seed".to_string()),
            ..Default::default()
        };
        let companies = storage.list_companies(&filters).await.unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].name, "Globex");
    }

    #[tokio::test]
    async fn test_no_match_returns_empty_not_error() {
        let storage = MemStorage::new();
        let filters = CompanyFilters {
            search: Some("nothing".to_string()),
            ..Default::default()
        };
        assert!(storage.list_companies(&filters).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", Some("B2B SaaS"), None))
            .await
            .unwrap();
        let patch = CompanyPatch {
            stage: Some("Series A".to_string()),
            ..Default::default()
        };
        let updated = storage
            .update_company(company.id, &patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.stage.as_deref(), Some("Series A"));
        assert_eq!(updated.sector.as_deref(), Some("B2B SaaS"));
        assert_eq!(updated.name, "Acme");
    }

    #[tokio::test]
    async fn test_update_missing_company_is_none() {
        let storage = MemStorage::new();
        let result = storage
            .update_company(42, &CompanyPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete_company_cascades_notes_and_items() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", None, None))
            .await
            .unwrap();
        let list = storage
            .create_list(&NewList {
                name: "Watchlist".to_string(),
                description: None,
            })
            .await
            .unwrap();
        storage.create_note(company.id, "call back").await.unwrap();
        storage.add_list_item(list.id, company.id).await.unwrap();

        assert!(storage.delete_company(company.id).await.unwrap());
        assert!(storage.list_notes(company.id).await.unwrap().is_empty());
        assert!(storage.get_list_items(list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_list_item_dedups() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", None, None))
            .await
            .unwrap();
        let list = storage
            .create_list(&NewList {
                name: "Watchlist".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let first = storage.add_list_item(list.id, company.id).await.unwrap();
        let second = storage.add_list_item(list.id, company.id).await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(storage.get_list_items(list.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_list_cascades_items() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", None, None))
            .await
            .unwrap();
        let list = storage
            .create_list(&NewList {
                name: "Watchlist".to_string(),
                description: None,
            })
            .await
            .unwrap();
        storage.add_list_item(list.id, company.id).await.unwrap();

        assert!(storage.delete_list(list.id).await.unwrap());
        assert!(storage.get_list(list.id).await.unwrap().is_none());
        assert!(storage.get_list_items(list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_with_items_drops_dangling_companies() {
        let storage = MemStorage::new();
        let company = storage
            .create_company(&new_company("Acme", None, None))
            .await
            .unwrap();
        let list = storage
            .create_list(&NewList {
                name: "Watchlist".to_string(),
                description: None,
            })
            .await
            .unwrap();
        storage.add_list_item(list.id, company.id).await.unwrap();
        // Dangling row pointing at a company that never existed
        storage.insert_raw_list_item(list.id, 999);

        let (_, items) = storage
            .get_list_with_items(list.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, company.id);
        // The underlying rows still hold both entries
        assert_eq!(storage.get_list_items(list.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_saved_search_roundtrip() {
        let storage = MemStorage::new();
        let search = storage
            .create_saved_search(&NewSavedSearch {
                name: "AI seed deals".to_string(),
                filters: serde_json::json!({"sector": "AI", "stage": "Seed"}),
            })
            .await
            .unwrap();
        assert_eq!(storage.list_saved_searches().await.unwrap().len(), 1);
        assert!(storage.delete_saved_search(search.id).await.unwrap());
        assert!(!storage.delete_saved_search(search.id).await.unwrap());
        assert!(storage.list_saved_searches().await.unwrap().is_empty());
    }
}
