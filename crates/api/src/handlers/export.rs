//! Site backup export.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pageforge_core::types::Timestamp;
use pageforge_db::models::layout::Layout;
use pageforge_db::models::page::Page;
use pageforge_db::repositories::{LayoutRepo, PageRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// One page with all of its layouts.
#[derive(Debug, Serialize)]
pub struct PageExport {
    #[serde(flatten)]
    pub page: Page,
    pub layouts: Vec<Layout>,
}

/// Full content backup.
#[derive(Debug, Serialize)]
pub struct SiteExport {
    pub pages: Vec<PageExport>,
    pub export_date: Timestamp,
}

/// GET /api/v1/export
///
/// Every page in display order with every layout (active or not).
pub async fn export_site(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let store = state.store.as_ref();
    let mut pages = Vec::new();
    for page in PageRepo::list(store).await? {
        let layouts = LayoutRepo::list_for_page(store, &page.id).await?;
        pages.push(PageExport { page, layouts });
    }

    tracing::info!(user_id = %user.user_id, pages = pages.len(), "Site exported");
    Ok(Json(DataResponse {
        data: SiteExport {
            pages,
            export_date: chrono::Utc::now(),
        },
    }))
}
