//! Handlers for site-wide settings.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::settings::{self, SettingsPatch};
use promptlib_db::repositories::SettingsRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/settings
///
/// The effective site settings. An absent settings row yields the defaults.
pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings = SettingsRepo::fetch(&state.pool).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/admin/settings
///
/// Merge a partial update over the current settings and upsert the row.
pub async fn update_settings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> AppResult<impl IntoResponse> {
    settings::validate_patch(&patch)?;

    let mut merged = SettingsRepo::fetch(&state.pool).await?;
    merged.apply(patch);

    let data = serde_json::to_value(&merged)
        .map_err(|e| AppError::InternalError(format!("Settings serialization error: {e}")))?;
    SettingsRepo::save(&state.pool, &data).await?;

    tracing::info!(user_id = %admin.user_id, "Settings updated");

    Ok(Json(DataResponse { data: merged }))
}
