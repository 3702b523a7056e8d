//! Public site reads.
//!
//! Anonymous visitors only ever see active, accessible pages; their
//! responses are served from and stored into the render cache. Signed-in
//! editors bypass the cache and may preview any page.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use pageforge_core::error::CoreError;
use pageforge_core::revalidation::{page_path, ROOT_PATH};
use pageforge_db::models::layout::Layout;
use pageforge_db::models::page::Page;
use pageforge_db::repositories::{LayoutRepo, PageRepo};
use serde::Serialize;
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// A page as rendered for the public site.
#[derive(Debug, Serialize)]
pub struct PublicPage {
    pub page: Page,
    /// Active layouts in display order.
    pub layouts: Vec<Layout>,
    /// Set when an editor previews a page that is not active.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub inactive: bool,
}

async fn render(state: &AppState, page: Page) -> AppResult<Value> {
    let layouts = LayoutRepo::list_active_for_page(state.store.as_ref(), &page.id).await?;
    let body = PublicPage {
        inactive: !page.active,
        page,
        layouts,
    };
    serde_json::to_value(&body).map_err(|e| AppError::InternalError(e.to_string()))
}

/// GET /page/{slug}
///
/// 404 when no page has the slug, or when an anonymous caller asks for a
/// page that is inactive or not accessible.
pub async fn get_page_by_slug(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let path = page_path(&slug);
    let anonymous = user.is_none();

    if anonymous {
        if let Some(cached) = state.render_cache.get(&path).await {
            return Ok(Json(cached));
        }
    }

    let generation = state.render_cache.generation().await;
    let page = PageRepo::find_by_slug(state.store.as_ref(), &slug)
        .await?
        .filter(|page| !anonymous || page.is_public())
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &slug)))?;

    let body = render(&state, page).await?;
    if anonymous {
        state.render_cache.insert(path, body.clone(), generation).await;
    }
    Ok(Json(body))
}

/// GET /
///
/// The active home page with its active layouts.
pub async fn get_home_page(
    MaybeAuthUser(user): MaybeAuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let anonymous = user.is_none();

    if anonymous {
        if let Some(cached) = state.render_cache.get(ROOT_PATH).await {
            return Ok(Json(cached));
        }
    }

    let generation = state.render_cache.generation().await;
    let page = PageRepo::find_home(state.store.as_ref())
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", "home")))?;

    let body = render(&state, page).await?;
    if anonymous {
        state
            .render_cache
            .insert(ROOT_PATH, body.clone(), generation)
            .await;
    }
    Ok(Json(body))
}

/// GET /api/v1/public/pages
///
/// Navigation entries: active, accessible, non-home pages in display order.
pub async fn list_navigation(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let pages = PageRepo::list_navigation(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: pages }))
}
