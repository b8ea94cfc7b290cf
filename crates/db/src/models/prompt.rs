//! Prompt models, DTOs, and listing parameters.

use promptlib_core::types::{DbId, ProfileId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::tag::TagInfo;

/// A row from the `prompts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prompt {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub author_id: Option<ProfileId>,
    pub view_count: i64,
    pub copy_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Author info joined onto listed prompts.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorInfo {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Internal join row: prompt columns plus the author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct PromptJoinRow {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub author_id: Option<ProfileId>,
    pub view_count: i64,
    pub copy_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author_username: Option<String>,
    pub author_avatar_url: Option<String>,
}

impl PromptJoinRow {
    /// Attach the flattened tag list and fold the author columns into
    /// [`AuthorInfo`].
    pub fn into_meta(self, tags: Vec<TagInfo>) -> PromptWithMeta {
        let author = self.author_username.map(|username| AuthorInfo {
            username,
            avatar_url: self.author_avatar_url,
        });
        PromptWithMeta {
            id: self.id,
            title: self.title,
            description: self.description,
            content: self.content,
            cover_image_url: self.cover_image_url,
            is_public: self.is_public,
            is_featured: self.is_featured,
            author_id: self.author_id,
            view_count: self.view_count,
            copy_count: self.copy_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            author,
            tags,
        }
    }
}

/// A prompt with its joined author and flattened tag list.
#[derive(Debug, Clone, Serialize)]
pub struct PromptWithMeta {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub is_featured: bool,
    pub author_id: Option<ProfileId>,
    pub view_count: i64,
    pub copy_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author: Option<AuthorInfo>,
    pub tags: Vec<TagInfo>,
}

/// One page of prompts plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PromptPage {
    pub prompts: Vec<PromptWithMeta>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Sortable columns for prompt listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptSortBy {
    #[default]
    CreatedAt,
    Title,
    ViewCount,
}

impl PromptSortBy {
    /// The qualified column name this variant sorts on.
    pub fn as_column(self) -> &'static str {
        match self {
            PromptSortBy::CreatedAt => "p.created_at",
            PromptSortBy::Title => "p.title",
            PromptSortBy::ViewCount => "p.view_count",
        }
    }
}

/// Sort direction for prompt listing.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Parameters for prompt listing and filtering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptListParams {
    /// 1-based page number. Defaults to 1.
    pub page: Option<i64>,
    /// Page size. Defaults to 20, clamped to 1..=100.
    pub limit: Option<i64>,
    /// Restrict to prompts carrying this tag.
    pub tag_id: Option<DbId>,
    /// Case-insensitive substring match on title or content.
    pub search: Option<String>,
    #[serde(default)]
    pub sort_by: PromptSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Visibility filter. Public endpoints force `Some(true)`.
    pub is_public: Option<bool>,
}

/// DTO for creating a prompt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePrompt {
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub cover_image_url: Option<String>,
    #[serde(default = "default_is_public")]
    pub is_public: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

fn default_is_public() -> bool {
    true
}

/// DTO for updating a prompt. Only supplied fields are applied; a supplied
/// `tag_ids` (including an empty list) replaces the full association set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePrompt {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: Option<bool>,
    pub is_featured: Option<bool>,
    pub tag_ids: Option<Vec<DbId>>,
}
