pub mod health;
pub mod pages;
pub mod public;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /public/pages                                    navigation list (public)
///
/// /pages                                           list, create
/// /pages/reorder                                   reorder (PUT)
/// /pages/watch                                     page snapshots (WebSocket)
/// /pages/{id}                                      get, update, delete
/// /pages/{id}/layouts                              list, create
/// /pages/{id}/layouts/reorder                      reorder (PUT)
/// /pages/{id}/layouts/watch                        layout snapshots (WebSocket)
/// /pages/{id}/layouts/{layout_id}                  get, update, delete
///
/// /settings                                        get, update
/// /export                                          full backup (GET)
/// ```
///
/// Everything except `/public/*` requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/public", public::api_router())
        .nest("/pages", pages::router())
        .route(
            "/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route("/export", get(handlers::export::export_site))
}
