//! Repository for the `profiles` table.

use promptlib_core::pagination::{
    clamp_limit, clamp_page, offset, total_pages, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use promptlib_core::roles::{STATUS_ACTIVE, STATUS_BANNED};
use promptlib_core::types::ProfileId;
use sqlx::PgPool;

use crate::models::profile::{
    CreateProfile, Profile, ProfileListParams, ProfilePage, ProfileStats, UpdateProfile,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, username, email, avatar_url, password_hash, role, status, \
    must_change_password, created_at, updated_at";

/// Provides CRUD and admin operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (username, email, role, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.role)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by ID.
    pub async fn find_by_id(pool: &PgPool, id: ProfileId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE username = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// List profiles with role/status/search filters and pagination,
    /// most recently created first.
    pub async fn list(
        pool: &PgPool,
        params: &ProfileListParams,
    ) -> Result<ProfilePage, sqlx::Error> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);

        let (where_clause, bind_values, bind_idx) = build_profile_filter(params);

        let count_query = format!("SELECT COUNT(*)::BIGINT FROM profiles {where_clause}");
        let total = bind_text_values_scalar(
            sqlx::query_scalar::<_, i64>(&count_query),
            &bind_values,
        )
        .fetch_one(pool)
        .await?;

        let list_query = format!(
            "SELECT {COLUMNS} FROM profiles {where_clause} \
             ORDER BY created_at DESC, id \
             LIMIT ${bind_idx} OFFSET ${}",
            bind_idx + 1
        );
        let users = bind_text_values_as(sqlx::query_as::<_, Profile>(&list_query), &bind_values)
            .bind(limit)
            .bind(offset(page, limit))
            .fetch_all(pool)
            .await?;

        Ok(ProfilePage {
            users,
            total,
            total_pages: total_pages(total, limit),
            current_page: page,
        })
    }

    /// Aggregate user counts in a single query.
    pub async fn stats(pool: &PgPool) -> Result<ProfileStats, sqlx::Error> {
        sqlx::query_as::<_, ProfileStats>(
            "SELECT \
                 COUNT(*)::BIGINT AS total, \
                 COUNT(*) FILTER (WHERE status = 'active')::BIGINT AS active, \
                 COUNT(*) FILTER (WHERE role = 'admin')::BIGINT AS admins, \
                 COUNT(*) FILTER (WHERE status = 'banned')::BIGINT AS banned \
             FROM profiles",
        )
        .fetch_one(pool)
        .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no profile with the given ID exists.
    pub async fn update(
        pool: &PgPool,
        id: ProfileId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                 username = COALESCE($2, username), \
                 email = COALESCE($3, email), \
                 avatar_url = COALESCE($4, avatar_url), \
                 role = COALESCE($5, role), \
                 status = COALESCE($6, status), \
                 must_change_password = COALESCE($7, must_change_password), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.avatar_url)
            .bind(&input.role)
            .bind(&input.status)
            .bind(input.must_change_password)
            .fetch_optional(pool)
            .await
    }

    /// Mark a profile banned. Returns `true` if the row was updated.
    pub async fn ban(pool: &PgPool, id: ProfileId) -> Result<bool, sqlx::Error> {
        Self::set_status(pool, id, STATUS_BANNED).await
    }

    /// Mark a profile active again. Returns `true` if the row was updated.
    pub async fn unban(pool: &PgPool, id: ProfileId) -> Result<bool, sqlx::Error> {
        Self::set_status(pool, id, STATUS_ACTIVE).await
    }

    async fn set_status(pool: &PgPool, id: ProfileId, status: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE profiles SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a fresh password hash from an admin reset: the account is
    /// reactivated and must change its password on next login.
    ///
    /// Returns `true` if the row was updated.
    pub async fn reset_password(
        pool: &PgPool,
        id: ProfileId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET \
                 password_hash = $2, \
                 must_change_password = true, \
                 status = 'active', \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a password hash chosen by the user and clear the
    /// must-change-password flag. Returns `true` if the row was updated.
    pub async fn change_password(
        pool: &PgPool,
        id: ProfileId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE profiles SET \
                 password_hash = $2, \
                 must_change_password = false, \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---------------------------------------------------------------------------
// Filter building
// ---------------------------------------------------------------------------

/// Build a WHERE clause and text bind values from user-listing parameters.
///
/// Returns `(where_clause, bind_values, next_bind_index)`.
fn build_profile_filter(params: &ProfileListParams) -> (String, Vec<String>, u32) {
    let mut conditions: Vec<String> = Vec::new();
    let mut bind_idx = 1u32;
    let mut bind_values: Vec<String> = Vec::new();

    if let Some(ref role) = params.role {
        conditions.push(format!("role = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(role.clone());
    }

    if let Some(ref status) = params.status {
        conditions.push(format!("status = ${bind_idx}"));
        bind_idx += 1;
        bind_values.push(status.clone());
    }

    if let Some(ref search) = params.search {
        if !search.is_empty() {
            conditions.push(format!(
                "(username ILIKE ${bind_idx} OR email ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
            bind_values.push(format!("%{search}%"));
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, bind_values, bind_idx)
}

/// Bind a slice of text values to a sqlx `QueryAs`.
fn bind_text_values_as<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    bind_values: &'q [String],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in bind_values {
        q = q.bind(val.as_str());
    }
    q
}

/// Bind a slice of text values to a sqlx `QueryScalar`.
fn bind_text_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    bind_values: &'q [String],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in bind_values {
        q = q.bind(val.as_str());
    }
    q
}
