//! Repository for the `tags` table.
//!
//! Uniqueness of `name` and `slug` is pre-checked here so handlers can
//! return a friendly conflict; the `uq_tags_*` unique indexes close the
//! remaining check-then-act window at the schema level.

use promptlib_core::types::DbId;
use sqlx::PgPool;

use crate::models::tag::{CreateTag, Tag, TagWithCount, UpdateTag};

/// Column list for `tags` queries.
const COLUMNS: &str = "id, name, slug, color, created_at";

/// Column list for aggregate queries including the per-tag prompt count.
const COUNT_COLUMNS: &str = "\
    t.id, t.name, t.slug, t.color, t.created_at, \
    COUNT(pt.prompt_id)::BIGINT AS prompt_count";

/// Default number of tags returned by the popular-tags listing.
pub const DEFAULT_POPULAR_LIMIT: i64 = 10;

/// Provides CRUD and usage-count operations for tags.
pub struct TagRepo;

impl TagRepo {
    /// List all tags ordered by name.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags ORDER BY name");
        sqlx::query_as::<_, Tag>(&query).fetch_all(pool).await
    }

    /// Find a tag by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a tag by its slug.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE slug = $1");
        sqlx::query_as::<_, Tag>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Check whether a slug is taken by a row other than `exclude_id`.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                 SELECT 1 FROM tags \
                 WHERE slug = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Check whether a name is taken by a row other than `exclude_id`.
    pub async fn name_exists(
        pool: &PgPool,
        name: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS( \
                 SELECT 1 FROM tags \
                 WHERE name = $1 AND ($2::BIGINT IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Insert a new tag, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTag, color: &str) -> Result<Tag, sqlx::Error> {
        let query = format!(
            "INSERT INTO tags (name, slug, color) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(color)
            .fetch_one(pool)
            .await
    }

    /// Update a tag. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no tag with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTag,
    ) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!(
            "UPDATE tags SET \
                 name = COALESCE($2, name), \
                 slug = COALESCE($3, slug), \
                 color = COALESCE($4, color) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.color)
            .fetch_optional(pool)
            .await
    }

    /// Delete a tag by ID. Callers must check [`Self::usage_count`] first;
    /// the schema-level RESTRICT also refuses deletion of tags in use.
    ///
    /// Returns `true` if a tag was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count the prompts carrying a tag.
    pub async fn usage_count(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM prompt_tags WHERE tag_id = $1",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// List all tags with their prompt counts in a single aggregate query.
    pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<TagWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COUNT_COLUMNS} FROM tags t \
             LEFT JOIN prompt_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id \
             ORDER BY t.name"
        );
        sqlx::query_as::<_, TagWithCount>(&query)
            .fetch_all(pool)
            .await
    }

    /// The most-used tags, ordered by prompt count descending.
    pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<TagWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {COUNT_COLUMNS} FROM tags t \
             LEFT JOIN prompt_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id \
             ORDER BY prompt_count DESC, t.name \
             LIMIT $1"
        );
        sqlx::query_as::<_, TagWithCount>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
