//! Bearer-token authentication extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use promptlib_core::error::CoreError;
use promptlib_core::types::ProfileId;

use crate::error::AppError;
use crate::state::AppState;

/// The caller's identity, proven by a valid Bearer JWT.
///
/// Handlers that need authentication take this as an extractor parameter;
/// requests without a valid token are rejected with 401 before the handler
/// body runs.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: ProfileId,
    pub role: String,
}

/// Pull the token out of the `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Missing Authorization header".into(),
            ))
        })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::Core(CoreError::Unauthorized(
            "Invalid Authorization format. Expected: Bearer <token>".into(),
        ))
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.config.jwt.decode_access_token(token).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

/// Optional authentication: `Some(AuthUser)` for a valid Bearer token,
/// `None` when no `Authorization` header is present.
///
/// A header that is present but invalid still rejects the request, so a
/// client with an expired token gets a 401 instead of being silently
/// treated as anonymous.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if parts.headers.get("authorization").is_none() {
            return Ok(MaybeAuthUser(None));
        }
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(MaybeAuthUser(Some(user)))
    }
}
