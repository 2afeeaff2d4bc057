pub mod prompts;
pub mod scrape;

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, CompletionClient};
use crate::models::company::Company;
use crate::storage::{EnrichmentClaim, EnrichmentUpdate, Storage};

use self::prompts::{build_enrichment_prompt, ENRICHMENT_SYSTEM};
use self::scrape::{extract_visible_text, PageFetcher, CONTENT_BUDGET};

/// The structured assessment the model must return. Parsing is strict: all
/// five fields must be present and `score` must land in 0..=100, otherwise
/// this pass is marked failed and no company fields are touched.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    pub summary: String,
    pub what_they_do: Vec<String>,
    pub keywords: Vec<String>,
    pub derived_signals: Vec<String>,
    pub score: i32,
}

/// Orchestrates the enrichment workflow: claim the company, scrape its
/// website (best effort), ask the model for a structured assessment, and
/// persist the terminal state.
pub struct Enricher {
    storage: Arc<dyn Storage>,
    llm: Arc<dyn CompletionClient>,
    fetcher: Arc<dyn PageFetcher>,
}

impl Enricher {
    pub fn new(
        storage: Arc<dyn Storage>,
        llm: Arc<dyn CompletionClient>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        Self {
            storage,
            llm,
            fetcher,
        }
    }

    /// Runs one enrichment pass for the company.
    ///
    /// The `processing` status is durably written before any external call,
    /// so concurrent readers can observe an in-flight enrichment. The claim
    /// is a compare-and-swap: a company already `processing` yields Conflict
    /// instead of racing on the terminal write. Any failure after the claim
    /// leaves the company in `failed` with its enrichment fields untouched.
    pub async fn enrich(&self, id: i32) -> Result<Company, AppError> {
        let company = match self.storage.claim_enrichment(id).await? {
            EnrichmentClaim::Claimed(company) => company,
            EnrichmentClaim::InFlight => {
                return Err(AppError::Conflict(format!(
                    "Enrichment already in progress for company {id}"
                )))
            }
            EnrichmentClaim::NotFound => {
                return Err(AppError::NotFound(format!("Company {id} not found")))
            }
        };

        match self.assess(&company).await {
            Ok(update) => {
                let updated = self.storage.complete_enrichment(id, &update).await?;
                updated.ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
            }
            Err(err) => {
                self.storage.fail_enrichment(id).await?;
                Err(err)
            }
        }
    }

    /// Scrape plus model call. A scrape failure degrades to an empty
    /// snippet; everything after that is fatal for this pass.
    async fn assess(&self, company: &Company) -> Result<EnrichmentUpdate, AppError> {
        let snippet = match self.fetcher.fetch(&company.website).await {
            Ok(html) => extract_visible_text(&html, CONTENT_BUDGET),
            Err(err) => {
                warn!(
                    "Could not scrape {}, falling back to general knowledge: {err}",
                    company.website
                );
                String::new()
            }
        };

        let prompt = build_enrichment_prompt(&company.name, &company.website, &snippet);
        let text = self
            .llm
            .complete(&prompt, ENRICHMENT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Completion call failed: {e}")))?;

        let result: EnrichmentResult = serde_json::from_str(strip_json_fences(&text))
            .map_err(|e| AppError::Llm(format!("Model returned a malformed assessment: {e}")))?;
        if !(0..=100).contains(&result.score) {
            return Err(AppError::Llm(format!(
                "Model score {} outside 0-100",
                result.score
            )));
        }

        info!(
            "Enriched company {} ({} keywords, score {})",
            company.id,
            result.keywords.len(),
            result.score
        );

        Ok(EnrichmentUpdate {
            summary: result.summary,
            what_they_do: result.what_they_do,
            keywords: result.keywords,
            derived_signals: result.derived_signals,
            score: result.score,
            enriched_at: Utc::now(),
        })
    }
}
