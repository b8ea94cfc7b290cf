//! Profile (user) models, DTOs, and listing parameters.

use promptlib_core::types::{ProfileId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
///
/// `password_hash` is never serialized into API responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: ProfileId,
    pub username: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: String,
    pub status: String,
    pub must_change_password: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One page of profiles plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub users: Vec<Profile>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Aggregate user counts for the admin dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProfileStats {
    pub total: i64,
    pub active: i64,
    pub admins: i64,
    pub banned: i64,
}

/// Parameters for user listing and filtering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<String>,
    pub status: Option<String>,
    /// Case-insensitive substring match on username or email.
    pub search: Option<String>,
}

/// DTO for creating a profile. The password hash is produced by the caller.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub username: String,
    pub email: Option<String>,
    pub role: String,
    pub password_hash: Option<String>,
}

/// DTO for updating a profile. Only supplied fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub username: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    pub must_change_password: Option<bool>,
}
