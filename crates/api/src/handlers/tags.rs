//! Handlers for tag browsing and the admin tag back-office.
//!
//! Name and slug uniqueness are pre-checked so the caller gets a specific
//! conflict message; the unique indexes backstop the remaining race.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::error::CoreError;
use promptlib_core::pagination::clamp_limit;
use promptlib_core::tag::{self, DEFAULT_COLOR};
use promptlib_core::types::DbId;
use promptlib_db::models::tag::{CreateTag, UpdateTag};
use promptlib_db::repositories::tag_repo::DEFAULT_POPULAR_LIMIT;
use promptlib_db::repositories::TagRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum number of tags returned by the popular-tags listing.
const MAX_POPULAR_LIMIT: i64 = 50;

/// Query parameters for `GET /api/v1/tags/popular`.
#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Browsing
// ---------------------------------------------------------------------------

/// GET /api/v1/tags
///
/// All tags ordered by name.
pub async fn list_tags(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_all(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/stats
///
/// All tags with their prompt counts.
pub async fn tag_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let tags = TagRepo::list_with_counts(&state.pool).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/popular?limit=
///
/// The most-used tags, by prompt count descending.
pub async fn popular_tags(
    State(state): State<AppState>,
    Query(params): Query<PopularParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_POPULAR_LIMIT, MAX_POPULAR_LIMIT);
    let tags = TagRepo::popular(&state.pool, limit).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// GET /api/v1/tags/{id}
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Tag", id))?;
    Ok(Json(DataResponse { data: tag }))
}

/// GET /api/v1/tags/slug/{slug}
pub async fn get_tag_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let tag = TagRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Tag", slug))?;
    Ok(Json(DataResponse { data: tag }))
}

// ---------------------------------------------------------------------------
// Admin mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/tags
pub async fn create_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTag>,
) -> AppResult<impl IntoResponse> {
    tag::validate_name(&input.name)?;
    tag::validate_slug(&input.slug)?;

    if TagRepo::slug_exists(&state.pool, &input.slug, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Slug already exists".into(),
        )));
    }
    if TagRepo::name_exists(&state.pool, &input.name, None).await? {
        return Err(AppError::Core(CoreError::Conflict(
            "Tag name already exists".into(),
        )));
    }

    let color = input.color.as_deref().unwrap_or(DEFAULT_COLOR);
    let created = TagRepo::create(&state.pool, &input, color).await?;

    tracing::info!(tag_id = created.id, user_id = %admin.user_id, "Tag created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/admin/tags/{id}
pub async fn update_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTag>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        tag::validate_name(name)?;
        if TagRepo::name_exists(&state.pool, name, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Tag name already exists".into(),
            )));
        }
    }
    if let Some(ref slug) = input.slug {
        tag::validate_slug(slug)?;
        if TagRepo::slug_exists(&state.pool, slug, Some(id)).await? {
            return Err(AppError::Core(CoreError::Conflict(
                "Slug already exists".into(),
            )));
        }
    }

    let updated = TagRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Tag", id))?;

    tracing::info!(tag_id = id, user_id = %admin.user_id, "Tag updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/admin/tags/{id}
///
/// Tags still carried by any prompt cannot be deleted.
pub async fn delete_tag(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let usage = TagRepo::usage_count(&state.pool, id).await?;
    if usage > 0 {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete tag that is in use by prompts".into(),
        )));
    }

    let deleted = TagRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(CoreError::not_found("Tag", id).into());
    }

    tracing::info!(tag_id = id, user_id = %admin.user_id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
