//! Route definitions for pages and their layouts, mounted at `/api/v1/pages`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{layouts, pages, watch};
use crate::state::AppState;

/// ```text
/// GET    /                                -> list_pages
/// POST   /                                -> create_page
/// PUT    /reorder                         -> reorder_pages
/// GET    /watch                           -> watch_pages
/// GET    /{id}                            -> get_page
/// PUT    /{id}                            -> update_page
/// DELETE /{id}                            -> delete_page
/// GET    /{id}/layouts                    -> list_layouts
/// POST   /{id}/layouts                    -> create_layout
/// PUT    /{id}/layouts/reorder            -> reorder_layouts
/// GET    /{id}/layouts/watch              -> watch_layouts
/// GET    /{id}/layouts/{layout_id}        -> get_layout
/// PUT    /{id}/layouts/{layout_id}        -> update_layout
/// DELETE /{id}/layouts/{layout_id}        -> delete_layout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::list_pages).post(pages::create_page))
        .route("/reorder", put(pages::reorder_pages))
        .route("/watch", get(watch::watch_pages))
        .route(
            "/{id}",
            get(pages::get_page)
                .put(pages::update_page)
                .delete(pages::delete_page),
        )
        .route(
            "/{id}/layouts",
            get(layouts::list_layouts).post(layouts::create_layout),
        )
        .route("/{id}/layouts/reorder", put(layouts::reorder_layouts))
        .route("/{id}/layouts/watch", get(watch::watch_layouts))
        .route(
            "/{id}/layouts/{layout_id}",
            get(layouts::get_layout)
                .put(layouts::update_layout)
                .delete(layouts::delete_layout),
        )
}
