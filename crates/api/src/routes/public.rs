//! Public site routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::{public, revalidate};
use crate::state::AppState;

/// Root-level site routes (not under `/api/v1`).
///
/// ```text
/// GET    /                 -> get_home_page
/// GET    /page/{slug}      -> get_page_by_slug
/// GET    /api/revalidate   -> revalidate_usage
/// POST   /api/revalidate   -> revalidate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(public::get_home_page))
        .route("/page/{slug}", get(public::get_page_by_slug))
        .route(
            "/api/revalidate",
            get(revalidate::revalidate_usage).post(revalidate::revalidate),
        )
}

/// Public API routes mounted at `/api/v1/public`.
///
/// ```text
/// GET    /pages            -> list_navigation
/// ```
pub fn api_router() -> Router<AppState> {
    Router::new().route("/pages", get(public::list_navigation))
}
