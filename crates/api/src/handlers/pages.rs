//! Handlers for the admin page endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pageforge_core::error::CoreError;
use pageforge_db::models::page::{CreatePage, UpdatePage};
use pageforge_db::repositories::PageRepo;

use super::ReorderRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/pages
///
/// List every page in display order, including inactive ones.
pub async fn list_pages(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let pages = PageRepo::list(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: pages }))
}

/// POST /api/v1/pages
pub async fn create_page(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreatePage>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .publisher
        .create_page(state.store.as_ref(), &input)
        .await?;

    tracing::debug!(page_id = %page.id, user_id = %user.user_id, "Create page request served");
    Ok((StatusCode::CREATED, Json(DataResponse { data: page })))
}

/// GET /api/v1/pages/{id}
pub async fn get_page(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let page = PageRepo::find_by_id(state.store.as_ref(), &page_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &page_id)))?;

    Ok(Json(DataResponse { data: page }))
}

/// PUT /api/v1/pages/{id}
///
/// Partially update a page. Renaming regenerates the slug.
pub async fn update_page(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(input): Json<UpdatePage>,
) -> AppResult<impl IntoResponse> {
    let page = state
        .publisher
        .update_page(state.store.as_ref(), &page_id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Page", &page_id)))?;

    Ok(Json(DataResponse { data: page }))
}

/// DELETE /api/v1/pages/{id}
///
/// Delete a page together with its layouts.
pub async fn delete_page(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .publisher
        .delete_page(state.store.as_ref(), &page_id)
        .await?;

    if !deleted {
        return Err(AppError::Core(CoreError::not_found("Page", page_id)));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/pages/reorder
///
/// Body: `{ "ids": [...] }` in the new display order.
pub async fn reorder_pages(
    _user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .publisher
        .reorder_pages(state.store.as_ref(), &input.ids)
        .await?;

    let pages = PageRepo::list(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: pages }))
}
