//! Handlers for the prompt library: public browsing/search, the admin
//! back-office CRUD, and the view counter.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::error::CoreError;
use promptlib_core::prompt;
use promptlib_core::types::DbId;
use promptlib_db::models::prompt::{CreatePrompt, PromptListParams, UpdatePrompt};
use promptlib_db::repositories::PromptRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Public listing & detail
// ---------------------------------------------------------------------------

/// GET /api/v1/prompts
///
/// Public prompt listing. Always restricted to public prompts regardless of
/// the supplied filter.
pub async fn list_prompts(
    State(state): State<AppState>,
    Query(mut params): Query<PromptListParams>,
) -> AppResult<impl IntoResponse> {
    params.is_public = Some(true);
    let page = PromptRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/prompts/{id}
///
/// Public prompt detail. Private prompts are reported as absent.
pub async fn get_prompt(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptRepo::find_by_id(&state.pool, id, true)
        .await?
        .ok_or_else(|| CoreError::not_found("Prompt", id))?;
    Ok(Json(DataResponse { data: prompt }))
}

/// POST /api/v1/prompts/{id}/view
///
/// Bump the view counter. Anonymous, fire-and-forget from the client's
/// perspective.
pub async fn view_prompt(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let bumped = PromptRepo::increment_view_count(&state.pool, id).await?;
    if !bumped {
        return Err(CoreError::not_found("Prompt", id).into());
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Admin listing & detail
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/prompts
///
/// Admin prompt listing with full filter control, including private prompts.
pub async fn admin_list_prompts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PromptListParams>,
) -> AppResult<impl IntoResponse> {
    let page = PromptRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/admin/prompts/{id}
pub async fn admin_get_prompt(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptRepo::find_by_id(&state.pool, id, false)
        .await?
        .ok_or_else(|| CoreError::not_found("Prompt", id))?;
    Ok(Json(DataResponse { data: prompt }))
}

// ---------------------------------------------------------------------------
// Admin mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/prompts
///
/// Create a prompt. Tag associations are written in the same transaction;
/// an invalid tag id rolls the whole create back.
pub async fn create_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreatePrompt>,
) -> AppResult<impl IntoResponse> {
    prompt::validate_title(&input.title)?;
    prompt::validate_content(&input.content)?;
    if let Some(ref description) = input.description {
        prompt::validate_description(description)?;
    }
    if let Some(ref cover) = input.cover_image_url {
        prompt::validate_cover_image_url(cover)?;
    }

    let created = PromptRepo::create(&state.pool, &input, Some(admin.user_id)).await?;

    tracing::info!(prompt_id = created.id, user_id = %admin.user_id, "Prompt created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/admin/prompts/{id}
///
/// Partial update. A supplied `tag_ids` (including `[]`) replaces the full
/// association set.
pub async fn update_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePrompt>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        prompt::validate_title(title)?;
    }
    if let Some(ref content) = input.content {
        prompt::validate_content(content)?;
    }
    if let Some(ref description) = input.description {
        prompt::validate_description(description)?;
    }
    if let Some(ref cover) = input.cover_image_url {
        prompt::validate_cover_image_url(cover)?;
    }

    let updated = PromptRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Prompt", id))?;

    tracing::info!(prompt_id = id, user_id = %admin.user_id, "Prompt updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/admin/prompts/{id}
pub async fn delete_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = PromptRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("Prompt", id).into());
    }

    tracing::info!(prompt_id = id, user_id = %admin.user_id, "Prompt deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/prompts/{id}/toggle
///
/// Flip a prompt's public visibility.
pub async fn toggle_prompt(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let prompt = PromptRepo::toggle_public(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Prompt", id))?;

    tracing::info!(
        prompt_id = id,
        is_public = prompt.is_public,
        user_id = %admin.user_id,
        "Prompt visibility toggled",
    );

    Ok(Json(DataResponse { data: prompt }))
}
