//! Cache revalidation endpoint.
//!
//! Receives invalidation requests (from this server's own notifier via
//! `SITE_URL`, or from other publishers) and evicts the render cache.

use std::collections::BTreeSet;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pageforge_core::revalidation::default_paths;
use serde::Deserialize;
use serde_json::json;

use crate::state::AppState;

/// Body of `POST /api/revalidate`. Both fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct RevalidateRequest {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

/// POST /api/revalidate
///
/// Evicts `path`, or the root plus every page when no path is given. When
/// `REVALIDATE_SECRET` is configured the body must carry the same secret.
pub async fn revalidate(
    State(state): State<AppState>,
    Json(input): Json<RevalidateRequest>,
) -> Response {
    if let Some(required) = &state.config.revalidate_secret {
        if input.secret.as_deref() != Some(required.as_str()) {
            tracing::warn!("Revalidation rejected: invalid or missing secret");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Invalid or missing secret" })),
            )
                .into_response();
        }
    }

    let path = input.path.filter(|p| !p.is_empty());
    let paths = match &path {
        Some(p) => BTreeSet::from([p.clone()]),
        None => default_paths(),
    };

    let mut evicted = 0;
    for p in &paths {
        evicted += state.render_cache.invalidate(p).await;
    }
    tracing::info!(path = path.as_deref().unwrap_or("all pages"), evicted, "Revalidated");

    Json(json!({
        "revalidated": true,
        "now": chrono::Utc::now().timestamp_millis(),
        "path": path.as_deref().unwrap_or("all pages"),
        "message": "Cache cleared successfully",
    }))
    .into_response()
}

/// GET /api/revalidate
///
/// Usage descriptor.
pub async fn revalidate_usage() -> impl IntoResponse {
    Json(json!({
        "message": "Revalidate API endpoint",
        "usage": {
            "method": "POST",
            "body": {
                "path": "/ (optional - defaults to all pages)",
                "secret": "required only if REVALIDATE_SECRET is set",
            },
        },
        "example": {
            "path": "/",
            "secret": "your-secret-if-configured",
        },
    }))
}
