//! Handlers for the site settings singleton.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use pageforge_db::models::settings::UpdateSettings;
use pageforge_db::repositories::SettingsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
///
/// Returns the settings, creating them with defaults on first access.
pub async fn get_settings(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::get(state.store.as_ref()).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/settings
pub async fn update_settings(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateSettings>,
) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::update(state.store.as_ref(), &input).await?;

    tracing::info!(user_id = %user.user_id, "Settings updated");
    Ok(Json(DataResponse { data: settings }))
}
