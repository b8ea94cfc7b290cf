//! Tag models and DTOs.

use promptlib_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub created_at: Timestamp,
}

/// Lightweight tag info embedded in prompt responses.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagInfo {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub color: String,
}

/// A tag with its prompt usage count, for the admin stats and popular-tags views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagWithCount {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub created_at: Timestamp,
    pub prompt_count: i64,
}

/// DTO for creating a tag.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTag {
    pub name: String,
    pub slug: String,
    /// Defaults to [`promptlib_core::tag::DEFAULT_COLOR`] when absent.
    pub color: Option<String>,
}

/// DTO for updating a tag. Only supplied fields are applied.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTag {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
}
