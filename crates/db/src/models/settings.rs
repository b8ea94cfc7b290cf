//! Settings row model. The effective settings shape lives in
//! [`promptlib_core::settings::SiteSettings`].

use promptlib_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// The single row of the `settings` table.
#[derive(Debug, Clone, FromRow)]
pub struct SettingsRow {
    pub id: DbId,
    pub data: serde_json::Value,
    pub updated_at: Timestamp,
}
