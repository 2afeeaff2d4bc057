use std::sync::Arc;

use crate::enrichment::Enricher;
use crate::storage::Storage;

/// Shared application state injected into all route handlers via Axum
/// extractors. Both fields are constructed explicitly in `main` — there is
/// no process-wide storage singleton.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub enricher: Arc<Enricher>,
}
