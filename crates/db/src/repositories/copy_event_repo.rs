//! Repository for the `copy_events` table.
//!
//! Events are append-only. Recording a copy bumps the prompt's copy counter
//! atomically in the same transaction, so the counter and the event log
//! cannot drift apart.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use promptlib_core::pagination::{
    clamp_limit, clamp_page, offset, total_pages, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use promptlib_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::copy_event::{
    CopyEvent, CopyEventListParams, CopyEventLogEntry, CopyEventPage, CopyStats, CreateCopyEvent,
};

/// Column list for `copy_events` queries.
const COLUMNS: &str = "id, prompt_id, user_id, ip_address, user_agent, referrer, created_at";

/// Column list for log queries joining the prompt title and username.
const LOG_COLUMNS: &str = "\
    ce.id, ce.prompt_id, p.title AS prompt_title, ce.user_id, pr.username, \
    ce.ip_address, ce.user_agent, ce.referrer, ce.created_at";

/// Default trailing window for statistics and the admin log.
pub const DEFAULT_STATS_DAYS: i64 = 30;

/// Provides recording and statistics operations for copy events.
pub struct CopyEventRepo;

impl CopyEventRepo {
    /// Record one copy action: bump the prompt's copy counter and append the
    /// event row in a single transaction.
    ///
    /// Returns `RowNotFound` when the prompt does not exist.
    pub async fn record(pool: &PgPool, input: &CreateCopyEvent) -> Result<CopyEvent, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let bumped = sqlx::query("UPDATE prompts SET copy_count = copy_count + 1 WHERE id = $1")
            .bind(input.prompt_id)
            .execute(&mut *tx)
            .await?;
        if bumped.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        let query = format!(
            "INSERT INTO copy_events (prompt_id, user_id, ip_address, user_agent, referrer) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let event = sqlx::query_as::<_, CopyEvent>(&query)
            .bind(input.prompt_id)
            .bind(input.user_id)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(&input.referrer)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(event)
    }

    /// Copy statistics over the trailing `days` window, optionally scoped to
    /// one prompt: total count, distinct non-anonymous users, and a per-day
    /// histogram keyed by `YYYY-MM-DD`.
    pub async fn stats(
        pool: &PgPool,
        prompt_id: Option<DbId>,
        days: i64,
    ) -> Result<CopyStats, sqlx::Error> {
        let since = window_start(days);

        let (total_copies, unique_users) = match prompt_id {
            Some(id) => {
                sqlx::query_as::<_, (i64, i64)>(
                    "SELECT COUNT(*)::BIGINT, COUNT(DISTINCT user_id)::BIGINT \
                     FROM copy_events \
                     WHERE created_at >= $1 AND prompt_id = $2",
                )
                .bind(since)
                .bind(id)
                .fetch_one(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, (i64, i64)>(
                    "SELECT COUNT(*)::BIGINT, COUNT(DISTINCT user_id)::BIGINT \
                     FROM copy_events \
                     WHERE created_at >= $1",
                )
                .bind(since)
                .fetch_one(pool)
                .await?
            }
        };

        let day_rows: Vec<(String, i64)> = match prompt_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT TO_CHAR(created_at, 'YYYY-MM-DD'), COUNT(*)::BIGINT \
                     FROM copy_events \
                     WHERE created_at >= $1 AND prompt_id = $2 \
                     GROUP BY 1 ORDER BY 1",
                )
                .bind(since)
                .bind(id)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT TO_CHAR(created_at, 'YYYY-MM-DD'), COUNT(*)::BIGINT \
                     FROM copy_events \
                     WHERE created_at >= $1 \
                     GROUP BY 1 ORDER BY 1",
                )
                .bind(since)
                .fetch_all(pool)
                .await?
            }
        };

        let daily: BTreeMap<String, i64> = day_rows.into_iter().collect();

        Ok(CopyStats {
            total_copies,
            unique_users,
            daily,
            prompt_id,
            days,
        })
    }

    /// Paginated admin log of copy events within the trailing window,
    /// newest first, with prompt title and username joined.
    pub async fn list(
        pool: &PgPool,
        params: &CopyEventListParams,
    ) -> Result<CopyEventPage, sqlx::Error> {
        let page = clamp_page(params.page);
        let limit = clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let days = params.days.unwrap_or(DEFAULT_STATS_DAYS);
        let since = window_start(days);

        let (total, events) = match params.prompt_id {
            Some(id) => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM copy_events ce \
                     WHERE ce.created_at >= $1 AND ce.prompt_id = $2",
                )
                .bind(since)
                .bind(id)
                .fetch_one(pool)
                .await?;

                let query = format!(
                    "SELECT {LOG_COLUMNS} FROM copy_events ce \
                     LEFT JOIN prompts p ON p.id = ce.prompt_id \
                     LEFT JOIN profiles pr ON pr.id = ce.user_id \
                     WHERE ce.created_at >= $1 AND ce.prompt_id = $2 \
                     ORDER BY ce.created_at DESC, ce.id DESC \
                     LIMIT $3 OFFSET $4"
                );
                let events = sqlx::query_as::<_, CopyEventLogEntry>(&query)
                    .bind(since)
                    .bind(id)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                (total, events)
            }
            None => {
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*)::BIGINT FROM copy_events ce WHERE ce.created_at >= $1",
                )
                .bind(since)
                .fetch_one(pool)
                .await?;

                let query = format!(
                    "SELECT {LOG_COLUMNS} FROM copy_events ce \
                     LEFT JOIN prompts p ON p.id = ce.prompt_id \
                     LEFT JOIN profiles pr ON pr.id = ce.user_id \
                     WHERE ce.created_at >= $1 \
                     ORDER BY ce.created_at DESC, ce.id DESC \
                     LIMIT $2 OFFSET $3"
                );
                let events = sqlx::query_as::<_, CopyEventLogEntry>(&query)
                    .bind(since)
                    .bind(limit)
                    .bind(offset(page, limit))
                    .fetch_all(pool)
                    .await?;
                (total, events)
            }
        };

        Ok(CopyEventPage {
            events,
            total,
            total_pages: total_pages(total, limit),
            current_page: page,
        })
    }

    /// All log entries within the trailing window, oldest first, for export.
    pub async fn export(
        pool: &PgPool,
        prompt_id: Option<DbId>,
        days: i64,
    ) -> Result<Vec<CopyEventLogEntry>, sqlx::Error> {
        let since = window_start(days);

        match prompt_id {
            Some(id) => {
                let query = format!(
                    "SELECT {LOG_COLUMNS} FROM copy_events ce \
                     LEFT JOIN prompts p ON p.id = ce.prompt_id \
                     LEFT JOIN profiles pr ON pr.id = ce.user_id \
                     WHERE ce.created_at >= $1 AND ce.prompt_id = $2 \
                     ORDER BY ce.created_at ASC, ce.id ASC"
                );
                sqlx::query_as::<_, CopyEventLogEntry>(&query)
                    .bind(since)
                    .bind(id)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let query = format!(
                    "SELECT {LOG_COLUMNS} FROM copy_events ce \
                     LEFT JOIN prompts p ON p.id = ce.prompt_id \
                     LEFT JOIN profiles pr ON pr.id = ce.user_id \
                     WHERE ce.created_at >= $1 \
                     ORDER BY ce.created_at ASC, ce.id ASC"
                );
                sqlx::query_as::<_, CopyEventLogEntry>(&query)
                    .bind(since)
                    .fetch_all(pool)
                    .await
            }
        }
    }
}

/// Start of the trailing `days` window.
fn window_start(days: i64) -> Timestamp {
    Utc::now() - Duration::days(days.max(0))
}
