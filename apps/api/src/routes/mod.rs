pub mod companies;
pub mod health;
pub mod lists;
pub mod notes;
pub mod saved_searches;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Companies
        .route(
            "/api/companies",
            get(companies::handle_list).post(companies::handle_create),
        )
        .route(
            "/api/companies/:id",
            get(companies::handle_get)
                .put(companies::handle_update)
                .delete(companies::handle_delete),
        )
        .route("/api/companies/:id/enrich", post(companies::handle_enrich))
        // Notes
        .route(
            "/api/companies/:id/notes",
            get(notes::handle_list).post(notes::handle_create),
        )
        // Lists
        .route(
            "/api/lists",
            get(lists::handle_list).post(lists::handle_create),
        )
        .route(
            "/api/lists/:id",
            get(lists::handle_get).delete(lists::handle_delete),
        )
        .route("/api/lists/:id/items", post(lists::handle_add_item))
        .route(
            "/api/lists/:id/items/:company_id",
            delete(lists::handle_remove_item),
        )
        // Saved searches
        .route(
            "/api/saved-searches",
            get(saved_searches::handle_list).post(saved_searches::handle_create),
        )
        .route(
            "/api/saved-searches/:id",
            delete(saved_searches::handle_delete),
        )
        .with_state(state)
}
