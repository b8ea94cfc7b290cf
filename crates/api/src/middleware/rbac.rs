//! Role gate for the admin route tree.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use promptlib_core::error::CoreError;
use promptlib_core::roles::ROLE_ADMIN;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Extractor that admits only callers whose token carries the `admin` role.
///
/// Anything else is rejected with 403 (or 401 when no valid token is
/// presented at all), so `/admin` handlers never see non-admin traffic.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}
