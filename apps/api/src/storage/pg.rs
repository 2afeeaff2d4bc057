use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::company::{Company, CompanyPatch, EnrichmentStatus, NewCompany};
use crate::models::list::{List, ListItem, NewList};
use crate::models::note::Note;
use crate::models::saved_search::{NewSavedSearch, SavedSearch};
use crate::storage::{CompanyFilters, EnrichmentClaim, EnrichmentUpdate, Storage};

/// PostgreSQL-backed storage. Each operation is a single statement except
/// the two cascading deletes, which run inside one transaction.
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn list_companies(&self, filters: &CompanyFilters) -> Result<Vec<Company>, AppError> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT * FROM companies
            WHERE ($1::text IS NULL
                   OR name ILIKE '%' || $1 || '%'
                   OR description ILIKE '%' || $1 || '%'
                   OR sector ILIKE '%' || $1 || '%')
              AND ($2::text IS NULL OR sector = $2)
              AND ($3::text IS NULL OR stage = $3)
              AND ($4::text IS NULL OR location = $4)
            ORDER BY id DESC
            "#,
        )
        .bind(filters.search.as_deref())
        .bind(filters.sector.as_deref())
        .bind(filters.stage.as_deref())
        .bind(filters.location.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn get_company(&self, id: i32) -> Result<Option<Company>, AppError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_company(&self, data: &NewCompany) -> Result<Company, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            INSERT INTO companies
                (name, website, sector, stage, location, description, logo_url, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0))
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.website)
        .bind(data.sector.as_deref())
        .bind(data.stage.as_deref())
        .bind(data.location.as_deref())
        .bind(data.description.as_deref())
        .bind(data.logo_url.as_deref())
        .bind(data.score)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn update_company(
        &self,
        id: i32,
        patch: &CompanyPatch,
    ) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                name = COALESCE($2, name),
                website = COALESCE($3, website),
                sector = COALESCE($4, sector),
                stage = COALESCE($5, stage),
                location = COALESCE($6, location),
                description = COALESCE($7, description),
                logo_url = COALESCE($8, logo_url),
                score = COALESCE($9, score),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .bind(patch.website.as_deref())
        .bind(patch.sector.as_deref())
        .bind(patch.stage.as_deref())
        .bind(patch.location.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.logo_url.as_deref())
        .bind(patch.score)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_company(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM notes WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM list_items WHERE company_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn claim_enrichment(&self, id: i32) -> Result<EnrichmentClaim, AppError> {
        let claimed = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET enrichment_status = $2, updated_at = now()
            WHERE id = $1 AND enrichment_status <> $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(EnrichmentStatus::Processing.as_str())
        .fetch_optional(&self.pool)
        .await?;

        if let Some(company) = claimed {
            return Ok(EnrichmentClaim::Claimed(company));
        }

        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(if exists.is_some() {
            EnrichmentClaim::InFlight
        } else {
            EnrichmentClaim::NotFound
        })
    }

    async fn complete_enrichment(
        &self,
        id: i32,
        update: &EnrichmentUpdate,
    ) -> Result<Option<Company>, AppError> {
        Ok(sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies SET
                summary = $2,
                what_they_do = $3,
                keywords = $4,
                derived_signals = $5,
                score = $6,
                enrichment_status = $7,
                last_enriched_at = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.summary)
        .bind(&update.what_they_do)
        .bind(&update.keywords)
        .bind(&update.derived_signals)
        .bind(update.score)
        .bind(EnrichmentStatus::Completed.as_str())
        .bind(update.enriched_at)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn fail_enrichment(&self, id: i32) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE companies SET enrichment_status = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(EnrichmentStatus::Failed.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_notes(&self, company_id: i32) -> Result<Vec<Note>, AppError> {
        Ok(sqlx::query_as::<_, Note>(
            "SELECT * FROM notes WHERE company_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_note(&self, company_id: i32, content: &str) -> Result<Note, AppError> {
        Ok(sqlx::query_as::<_, Note>(
            "INSERT INTO notes (company_id, content) VALUES ($1, $2) RETURNING *",
        )
        .bind(company_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_lists(&self) -> Result<Vec<List>, AppError> {
        Ok(sqlx::query_as::<_, List>(
            "SELECT * FROM lists ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_list(&self, id: i32) -> Result<Option<List>, AppError> {
        Ok(sqlx::query_as::<_, List>("SELECT * FROM lists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_list(&self, data: &NewList) -> Result<List, AppError> {
        Ok(sqlx::query_as::<_, List>(
            "INSERT INTO lists (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(data.description.as_deref())
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_list(&self, id: i32) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM list_items WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_list_items(&self, list_id: i32) -> Result<Vec<ListItem>, AppError> {
        Ok(sqlx::query_as::<_, ListItem>(
            "SELECT * FROM list_items WHERE list_id = $1 ORDER BY id",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_list_with_items(
        &self,
        id: i32,
    ) -> Result<Option<(List, Vec<Company>)>, AppError> {
        let Some(list) = self.get_list(id).await? else {
            return Ok(None);
        };
        // Inner join drops items whose company has been deleted
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT c.* FROM list_items li
            JOIN companies c ON c.id = li.company_id
            WHERE li.list_id = $1
            ORDER BY li.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(Some((list, companies)))
    }

    async fn add_list_item(&self, list_id: i32, company_id: i32) -> Result<ListItem, AppError> {
        let inserted = sqlx::query_as::<_, ListItem>(
            r#"
            INSERT INTO list_items (list_id, company_id) VALUES ($1, $2)
            ON CONFLICT (list_id, company_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(list_id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        match inserted {
            Some(item) => Ok(item),
            None => Ok(sqlx::query_as::<_, ListItem>(
                "SELECT * FROM list_items WHERE list_id = $1 AND company_id = $2",
            )
            .bind(list_id)
            .bind(company_id)
            .fetch_one(&self.pool)
            .await?),
        }
    }

    async fn remove_list_item(&self, list_id: i32, company_id: i32) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM list_items WHERE list_id = $1 AND company_id = $2")
                .bind(list_id)
                .bind(company_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_saved_searches(&self) -> Result<Vec<SavedSearch>, AppError> {
        Ok(sqlx::query_as::<_, SavedSearch>(
            "SELECT * FROM saved_searches ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn create_saved_search(&self, data: &NewSavedSearch) -> Result<SavedSearch, AppError> {
        Ok(sqlx::query_as::<_, SavedSearch>(
            "INSERT INTO saved_searches (name, filters) VALUES ($1, $2) RETURNING *",
        )
        .bind(&data.name)
        .bind(&data.filters)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn delete_saved_search(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM saved_searches WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
