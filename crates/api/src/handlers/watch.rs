//! WebSocket snapshot streams for the admin UI.

use std::sync::Arc;

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use pageforge_core::error::CoreError;
use pageforge_db::repositories::{LayoutRepo, PageRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::ws;

/// GET /api/v1/pages/watch
///
/// Streams the full ordered page list on connect and after every change.
pub async fn watch_pages(
    user: AuthUser,
    State(state): State<AppState>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    tracing::debug!(user_id = %user.user_id, "Page watch requested");
    let subscription = PageRepo::subscribe(Arc::clone(&state.store));
    upgrade.on_upgrade(move |socket| ws::stream_snapshots(socket, subscription))
}

/// GET /api/v1/pages/{id}/layouts/watch
///
/// Streams the page's ordered layouts on connect and after every change.
pub async fn watch_layouts(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    upgrade: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    if PageRepo::find_by_id(state.store.as_ref(), &page_id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("Page", page_id)));
    }

    let subscription = LayoutRepo::subscribe(Arc::clone(&state.store), &page_id);
    Ok(upgrade.on_upgrade(move |socket| ws::stream_snapshots(socket, subscription)))
}
