//! Copy-event models, statistics shapes, and listing parameters.

use std::collections::BTreeMap;

use promptlib_core::types::{DbId, ProfileId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `copy_events` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CopyEvent {
    pub id: DbId,
    pub prompt_id: DbId,
    pub user_id: Option<ProfileId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for recording one copy action.
#[derive(Debug, Clone)]
pub struct CreateCopyEvent {
    pub prompt_id: DbId,
    /// `None` for anonymous copies.
    pub user_id: Option<ProfileId>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

/// A copy event joined with the prompt title and username, for the admin log.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CopyEventLogEntry {
    pub id: DbId,
    pub prompt_id: DbId,
    pub prompt_title: Option<String>,
    pub user_id: Option<ProfileId>,
    pub username: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub created_at: Timestamp,
}

/// One page of copy-event log entries plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct CopyEventPage {
    pub events: Vec<CopyEventLogEntry>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Copy statistics over a trailing window.
#[derive(Debug, Clone, Serialize)]
pub struct CopyStats {
    pub total_copies: i64,
    /// Distinct non-anonymous users in the window.
    pub unique_users: i64,
    /// Copies per day, keyed by `YYYY-MM-DD`.
    pub daily: BTreeMap<String, i64>,
    pub prompt_id: Option<DbId>,
    pub days: i64,
}

/// Parameters for the admin copy-event log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CopyEventListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub prompt_id: Option<DbId>,
    /// Trailing window in days. Defaults to 30.
    pub days: Option<i64>,
}
