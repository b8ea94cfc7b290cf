//! Handlers for user administration and own-profile updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::error::CoreError;
use promptlib_core::profile;
use promptlib_core::roles::{validate_role, validate_status};
use promptlib_core::types::ProfileId;
use promptlib_db::models::profile::{CreateProfile, ProfileListParams, UpdateProfile};
use promptlib_db::repositories::{ProfileRepo, SessionRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::{generate_password, hash_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub password: Option<String>,
}

/// Request body for `POST /admin/users/{id}/reset-password`.
#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordRequest {
    /// When absent, a password is generated server-side.
    pub password: Option<String>,
}

/// Response body for a password reset. The plaintext password is returned
/// exactly once so the admin can hand it to the user; it is never logged.
#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub password: String,
    pub message: String,
}

/// Request body for `PUT /users/me`.
#[derive(Debug, Deserialize)]
pub struct UpdateOwnProfileRequest {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Listing & stats
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
///
/// Paginated user listing with role/status/search filters.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ProfileListParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref role) = params.role {
        validate_role(role)?;
    }
    if let Some(ref status) = params.status {
        validate_status(status)?;
    }

    let page = ProfileRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/admin/users/stats
pub async fn user_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let stats = ProfileRepo::stats(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProfileId>,
) -> AppResult<impl IntoResponse> {
    let user = ProfileRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", id))?;
    Ok(Json(DataResponse { data: user }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/users
///
/// Create a user or admin account.
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    profile::validate_username(&input.username)?;
    validate_role(&input.role)?;

    let password_hash = match input.password {
        Some(ref password) => {
            profile::validate_password(password)?;
            let hash = hash_password(password)
                .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
            Some(hash)
        }
        None => None,
    };

    let created = ProfileRepo::create(
        &state.pool,
        &CreateProfile {
            username: input.username,
            email: input.email,
            role: input.role,
            password_hash,
        },
    )
    .await?;

    tracing::info!(new_user_id = %created.id, role = %created.role, user_id = %admin.user_id, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// PUT /api/v1/admin/users/{id}
///
/// Partial profile update.
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProfileId>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref username) = input.username {
        profile::validate_username(username)?;
    }
    if let Some(ref avatar_url) = input.avatar_url {
        profile::validate_avatar_url(avatar_url)?;
    }
    if let Some(ref role) = input.role {
        validate_role(role)?;
    }
    if let Some(ref status) = input.status {
        validate_status(status)?;
    }

    let updated = ProfileRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", id))?;

    tracing::info!(target_user_id = %id, user_id = %admin.user_id, "User updated");

    Ok(Json(DataResponse { data: updated }))
}

/// POST /api/v1/admin/users/{id}/ban
///
/// Set the account to banned and revoke its sessions. The status change
/// stands even if session revocation fails.
pub async fn ban_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProfileId>,
) -> AppResult<StatusCode> {
    let banned = ProfileRepo::ban(&state.pool, id).await?;
    if !banned {
        return Err(CoreError::not_found("Profile", id).into());
    }

    if let Err(e) = SessionRepo::revoke_all_for_user(&state.pool, id).await {
        tracing::warn!(target_user_id = %id, error = %e, "Failed to revoke sessions for banned user");
    }

    tracing::info!(target_user_id = %id, user_id = %admin.user_id, "User banned");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/unban
pub async fn unban_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProfileId>,
) -> AppResult<StatusCode> {
    let unbanned = ProfileRepo::unban(&state.pool, id).await?;
    if !unbanned {
        return Err(CoreError::not_found("Profile", id).into());
    }

    tracing::info!(target_user_id = %id, user_id = %admin.user_id, "User unbanned");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/users/{id}/reset-password
///
/// Store a fresh credential (supplied or generated), force a password change
/// on next login, reactivate the account, and revoke existing sessions.
pub async fn reset_password(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProfileId>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<impl IntoResponse> {
    let password = match input.password {
        Some(password) => {
            profile::validate_password(&password)?;
            password
        }
        None => generate_password(),
    };

    let hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let reset = ProfileRepo::reset_password(&state.pool, id, &hash).await?;
    if !reset {
        return Err(CoreError::not_found("Profile", id).into());
    }

    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(target_user_id = %id, user_id = %admin.user_id, "Password reset");

    Ok(Json(DataResponse {
        data: ResetPasswordResponse {
            password,
            message: "Password has been reset. The user must change it on next login."
                .to_string(),
        },
    }))
}

// ---------------------------------------------------------------------------
// Own profile
// ---------------------------------------------------------------------------

/// PUT /api/v1/users/me
///
/// Update the caller's own username and avatar.
pub async fn update_own_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateOwnProfileRequest>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref username) = input.username {
        profile::validate_username(username)?;
    }
    if let Some(ref avatar_url) = input.avatar_url {
        profile::validate_avatar_url(avatar_url)?;
    }

    let updates = UpdateProfile {
        username: input.username,
        avatar_url: input.avatar_url,
        ..UpdateProfile::default()
    };

    let updated = ProfileRepo::update(&state.pool, auth.user_id, &updates)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", auth.user_id))?;

    Ok(Json(DataResponse { data: updated }))
}
