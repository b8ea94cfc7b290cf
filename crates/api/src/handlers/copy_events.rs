//! Handlers for copy tracking: the public copy endpoint, admin statistics,
//! the admin event log, and its CSV export.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::types::DbId;
use promptlib_db::models::copy_event::{CopyEventListParams, CreateCopyEvent};
use promptlib_db::repositories::copy_event_repo::DEFAULT_STATS_DAYS;
use promptlib_db::repositories::{CopyEventRepo, SettingsRepo};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{csv_attachment, DataResponse};
use crate::state::AppState;

/// Query parameters for `GET /admin/copy-stats` and the CSV export.
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    pub prompt_id: Option<DbId>,
    /// Trailing window in days. Defaults to 30.
    pub days: Option<i64>,
}

/// Response body for a recorded copy.
#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub event_id: DbId,
    /// The site-configured copy-success message, for the client to display.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Public copy endpoint
// ---------------------------------------------------------------------------

/// POST /api/v1/prompts/{id}/copy
///
/// Record one copy action. Works anonymously; a valid Bearer token
/// attributes the copy to the caller.
pub async fn copy_prompt(
    MaybeAuthUser(auth): MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let event = CopyEventRepo::record(
        &state.pool,
        &CreateCopyEvent {
            prompt_id: id,
            user_id: auth.map(|user| user.user_id),
            ip_address: header_value(&headers, "x-forwarded-for")
                .map(|raw| raw.split(',').next().unwrap_or(raw).trim().to_string()),
            user_agent: header_value(&headers, "user-agent").map(str::to_string),
            referrer: header_value(&headers, "referer").map(str::to_string),
        },
    )
    .await?;

    let settings = SettingsRepo::fetch(&state.pool).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CopyResponse {
                event_id: event.id,
                message: settings.copy_success_message,
            },
        }),
    ))
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// ---------------------------------------------------------------------------
// Admin statistics & log
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/copy-stats?prompt_id=&days=
pub async fn copy_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(DEFAULT_STATS_DAYS);
    let stats = CopyEventRepo::stats(&state.pool, params.prompt_id, days).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/admin/copy-events?prompt_id=&days=&page=&limit=
pub async fn list_copy_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CopyEventListParams>,
) -> AppResult<impl IntoResponse> {
    let page = CopyEventRepo::list(&state.pool, &params).await?;
    Ok(Json(page))
}

/// GET /api/v1/admin/copy-events/export?prompt_id=&days=
///
/// Export the filtered event log as a CSV attachment.
pub async fn export_copy_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> AppResult<impl IntoResponse> {
    let days = params.days.unwrap_or(DEFAULT_STATS_DAYS);
    let events = CopyEventRepo::export(&state.pool, params.prompt_id, days).await?;

    let mut csv_output = String::from("ID,Title,User,IP,User-Agent,Timestamp\n");
    for event in &events {
        csv_output.push_str(&format!(
            "{},{},{},{},{},{}\n",
            event.id,
            csv_escape(event.prompt_title.as_deref().unwrap_or("")),
            csv_escape(event.username.as_deref().unwrap_or("")),
            csv_escape(event.ip_address.as_deref().unwrap_or("")),
            csv_escape(event.user_agent.as_deref().unwrap_or("")),
            event.created_at.to_rfc3339(),
        ));
    }

    Ok(csv_attachment("copy-events.csv", csv_output))
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_fields_pass_through() {
        assert_eq!(csv_escape("Mozilla/5.0"), "Mozilla/5.0");
        assert_eq!(csv_escape(""), "");
    }

    #[test]
    fn delimiters_force_quoting() {
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
