//! Handlers for the admin layout endpoints, nested under a page.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use pageforge_core::error::CoreError;
use pageforge_db::models::layout::{CreateLayout, UpdateLayout};
use pageforge_db::repositories::{LayoutRepo, PageRepo};

use super::ReorderRequest;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

fn layout_not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found("Layout", id))
}

/// GET /api/v1/pages/{id}/layouts
///
/// List every layout of the page in display order, including inactive ones.
pub async fn list_layouts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if PageRepo::find_by_id(state.store.as_ref(), &page_id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Page", page_id)));
    }

    let layouts = LayoutRepo::list_for_page(state.store.as_ref(), &page_id).await?;
    Ok(Json(DataResponse { data: layouts }))
}

/// POST /api/v1/pages/{id}/layouts
pub async fn create_layout(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(input): Json<CreateLayout>,
) -> AppResult<impl IntoResponse> {
    let layout = state
        .publisher
        .create_layout(state.store.as_ref(), &page_id, &input)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: layout })))
}

/// GET /api/v1/pages/{id}/layouts/{layout_id}
pub async fn get_layout(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((page_id, layout_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let layout = LayoutRepo::find_by_id(state.store.as_ref(), &page_id, &layout_id)
        .await?
        .ok_or_else(|| layout_not_found(&layout_id))?;

    Ok(Json(DataResponse { data: layout }))
}

/// PUT /api/v1/pages/{id}/layouts/{layout_id}
pub async fn update_layout(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((page_id, layout_id)): Path<(String, String)>,
    Json(input): Json<UpdateLayout>,
) -> AppResult<impl IntoResponse> {
    let layout = state
        .publisher
        .update_layout(state.store.as_ref(), &page_id, &layout_id, &input)
        .await?
        .ok_or_else(|| layout_not_found(&layout_id))?;

    Ok(Json(DataResponse { data: layout }))
}

/// DELETE /api/v1/pages/{id}/layouts/{layout_id}
pub async fn delete_layout(
    _user: AuthUser,
    State(state): State<AppState>,
    Path((page_id, layout_id)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let deleted = state
        .publisher
        .delete_layout(state.store.as_ref(), &page_id, &layout_id)
        .await?;

    if !deleted {
        return Err(layout_not_found(&layout_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/pages/{id}/layouts/reorder
///
/// Body: `{ "ids": [...] }` listing every layout of the page exactly once.
pub async fn reorder_layouts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(input): Json<ReorderRequest>,
) -> AppResult<impl IntoResponse> {
    state
        .publisher
        .reorder_layouts(state.store.as_ref(), &page_id, &input.ids)
        .await?;

    let layouts = LayoutRepo::list_for_page(state.store.as_ref(), &page_id).await?;
    Ok(Json(DataResponse { data: layouts }))
}
