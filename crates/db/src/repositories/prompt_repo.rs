//! Repository for the `prompts` and `prompt_tags` tables.
//!
//! Provides paginated listing with tag/search/visibility filters,
//! transactional create/update with full tag-set replacement, and atomic
//! view/copy counter increments.

use std::collections::HashMap;

use promptlib_core::pagination::{
    clamp_limit, clamp_page, offset, total_pages, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use promptlib_core::types::{DbId, ProfileId};
use sqlx::PgPool;

use crate::models::prompt::{
    CreatePrompt, Prompt, PromptJoinRow, PromptListParams, PromptPage, PromptWithMeta,
    UpdatePrompt,
};
use crate::models::tag::TagInfo;

/// Column list for `prompts` queries.
const COLUMNS: &str = "\
    id, title, description, content, cover_image_url, is_public, is_featured, \
    author_id, view_count, copy_count, created_at, updated_at";

/// Column list for listing queries joining the author profile.
const JOIN_COLUMNS: &str = "\
    p.id, p.title, p.description, p.content, p.cover_image_url, p.is_public, \
    p.is_featured, p.author_id, p.view_count, p.copy_count, p.created_at, \
    p.updated_at, pr.username AS author_username, pr.avatar_url AS author_avatar_url";

/// Provides CRUD and listing operations for prompts.
pub struct PromptRepo;

impl PromptRepo {
    // -----------------------------------------------------------------------
    // Listing & filtering
    // -----------------------------------------------------------------------

    /// List prompts with filtering, sorting, and pagination.
    ///
    /// When `tag_id` is set, the matching prompt ids are resolved from
    /// `prompt_tags` first; a tag with no associations short-circuits to an
    /// empty page without running the main query.
    pub async fn list(pool: &PgPool, params: &PromptListParams) -> Result<PromptPage, sqlx::Error> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

        let tag_prompt_ids = match params.tag_id {
            Some(tag_id) => {
                let ids = Self::ids_for_tag(pool, tag_id).await?;
                if ids.is_empty() {
                    return Ok(PromptPage {
                        prompts: Vec::new(),
                        total: 0,
                        total_pages: 0,
                        current_page: page,
                    });
                }
                Some(ids)
            }
            None => None,
        };

        let (where_clause, bind_values, bind_idx) = build_prompt_filter(params, tag_prompt_ids);

        let count_query =
            format!("SELECT COUNT(*)::BIGINT FROM prompts p {where_clause}");
        let total = bind_values_scalar(sqlx::query_scalar::<_, i64>(&count_query), &bind_values)
            .fetch_one(pool)
            .await?;

        let list_query = format!(
            "SELECT {JOIN_COLUMNS} FROM prompts p \
             LEFT JOIN profiles pr ON pr.id = p.author_id \
             {where_clause} \
             ORDER BY {} {}, p.id DESC \
             LIMIT ${bind_idx} OFFSET ${}",
            params.sort_by.as_column(),
            params.sort_order.as_sql(),
            bind_idx + 1
        );
        let rows = bind_values_as(sqlx::query_as::<_, PromptJoinRow>(&list_query), &bind_values)
            .bind(limit)
            .bind(offset(page, limit))
            .fetch_all(pool)
            .await?;

        let prompts = Self::attach_tags(pool, rows).await?;

        Ok(PromptPage {
            prompts,
            total,
            total_pages: total_pages(total, limit),
            current_page: page,
        })
    }

    /// Find one prompt with its author and tags.
    ///
    /// With `public_only`, private prompts are reported as absent.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
        public_only: bool,
    ) -> Result<Option<PromptWithMeta>, sqlx::Error> {
        let visibility = if public_only {
            " AND p.is_public = true"
        } else {
            ""
        };
        let query = format!(
            "SELECT {JOIN_COLUMNS} FROM prompts p \
             LEFT JOIN profiles pr ON pr.id = p.author_id \
             WHERE p.id = $1{visibility}"
        );
        let row = sqlx::query_as::<_, PromptJoinRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut prompts = Self::attach_tags(pool, vec![row]).await?;
        Ok(prompts.pop())
    }

    /// Resolve the prompt ids carrying a tag.
    pub async fn ids_for_tag(pool: &PgPool, tag_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>("SELECT prompt_id FROM prompt_tags WHERE tag_id = $1")
            .bind(tag_id)
            .fetch_all(pool)
            .await
    }

    /// Ids and last-modified timestamps of all public prompts, for the
    /// sitemap.
    pub async fn public_sitemap_entries(
        pool: &PgPool,
    ) -> Result<Vec<(DbId, promptlib_core::types::Timestamp)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, updated_at FROM prompts WHERE is_public = true ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Create a prompt and its tag associations in one transaction.
    ///
    /// A failed association insert (e.g. an unknown tag id) rolls the whole
    /// operation back; no prompt row remains.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePrompt,
        author_id: Option<ProfileId>,
    ) -> Result<Prompt, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO prompts \
                 (title, description, content, cover_image_url, is_public, is_featured, author_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let prompt = sqlx::query_as::<_, Prompt>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(&input.cover_image_url)
            .bind(input.is_public)
            .bind(input.is_featured)
            .bind(author_id)
            .fetch_one(&mut *tx)
            .await?;

        if !input.tag_ids.is_empty() {
            insert_tag_rows(&mut tx, prompt.id, &input.tag_ids).await?;
        }

        tx.commit().await?;
        Ok(prompt)
    }

    /// Update a prompt. Only non-`None` fields in `input` are applied.
    ///
    /// When `tag_ids` is supplied (including an empty list), the full
    /// association set is replaced in the same transaction. Returns `None`
    /// if no prompt with the given id exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePrompt,
    ) -> Result<Option<Prompt>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE prompts SET \
                 title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 content = COALESCE($4, content), \
                 cover_image_url = COALESCE($5, cover_image_url), \
                 is_public = COALESCE($6, is_public), \
                 is_featured = COALESCE($7, is_featured), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let prompt = sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.content)
            .bind(&input.cover_image_url)
            .bind(input.is_public)
            .bind(input.is_featured)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(prompt) = prompt else {
            return Ok(None);
        };

        if let Some(ref tag_ids) = input.tag_ids {
            sqlx::query("DELETE FROM prompt_tags WHERE prompt_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            if !tag_ids.is_empty() {
                insert_tag_rows(&mut tx, id, tag_ids).await?;
            }
        }

        tx.commit().await?;
        Ok(Some(prompt))
    }

    /// Delete a prompt. Associations and copy events cascade at the schema
    /// level. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM prompts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Flip a prompt's visibility. Returns the updated row, or `None` if no
    /// prompt with the given id exists.
    pub async fn toggle_public(pool: &PgPool, id: DbId) -> Result<Option<Prompt>, sqlx::Error> {
        let query = format!(
            "UPDATE prompts SET is_public = NOT is_public, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prompt>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Counters
    // -----------------------------------------------------------------------

    /// Atomically bump the view counter. Returns `true` if the prompt exists.
    pub async fn increment_view_count(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE prompts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Fetch and group the tags for a batch of prompt rows in one query.
    async fn attach_tags(
        pool: &PgPool,
        rows: Vec<PromptJoinRow>,
    ) -> Result<Vec<PromptWithMeta>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<DbId> = rows.iter().map(|row| row.id).collect();
        let tag_rows = sqlx::query_as::<_, PromptTagJoinRow>(
            "SELECT pt.prompt_id, t.id, t.name, t.slug, t.color \
             FROM prompt_tags pt \
             JOIN tags t ON t.id = pt.tag_id \
             WHERE pt.prompt_id = ANY($1) \
             ORDER BY t.name",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_prompt: HashMap<DbId, Vec<TagInfo>> = HashMap::new();
        for tag_row in tag_rows {
            by_prompt
                .entry(tag_row.prompt_id)
                .or_default()
                .push(TagInfo {
                    id: tag_row.id,
                    name: tag_row.name,
                    slug: tag_row.slug,
                    color: tag_row.color,
                });
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = by_prompt.remove(&row.id).unwrap_or_default();
                row.into_meta(tags)
            })
            .collect())
    }
}

/// Join row for flattening `prompt_tags` into per-prompt tag lists.
#[derive(Debug, sqlx::FromRow)]
struct PromptTagJoinRow {
    prompt_id: DbId,
    id: DbId,
    name: String,
    slug: String,
    color: String,
}

/// Insert the association rows for a prompt inside an open transaction.
async fn insert_tag_rows(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    prompt_id: DbId,
    tag_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO prompt_tags (prompt_id, tag_id) \
         SELECT $1, tag_id FROM UNNEST($2::BIGINT[]) AS tag_id",
    )
    .bind(prompt_id)
    .bind(tag_ids)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

/// A deferred bind value for dynamically assembled filters.
enum BindValue {
    Bool(bool),
    Ids(Vec<DbId>),
    Text(String),
}

/// Build a WHERE clause and bind values from listing parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`. The clause is
/// empty when no filters are active, or starts with `WHERE `.
fn build_prompt_filter(
    params: &PromptListParams,
    tag_prompt_ids: Option<Vec<DbId>>,
) -> (String, Vec<BindValue>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<BindValue> = Vec::new();

    if let Some(is_public) = params.is_public {
        conditions.push(format!("p.is_public = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(BindValue::Bool(is_public));
    }

    if let Some(ids) = tag_prompt_ids {
        conditions.push(format!("p.id = ANY(${bind_idx})"));
        bind_idx += 1;
        bind_values.push(BindValue::Ids(ids));
    }

    if let Some(ref search) = params.search {
        if !search.is_empty() {
            conditions.push(format!(
                "(p.title ILIKE ${bind_idx} OR p.content ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
            bind_values.push(BindValue::Text(format!("%{search}%")));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
fn bind_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Ids(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar`.
fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        match val {
            BindValue::Bool(v) => q = q.bind(*v),
            BindValue::Ids(v) => q = q.bind(v.as_slice()),
            BindValue::Text(v) => q = q.bind(v.as_str()),
        }
    }
    q
}
