//! HTTP error mapping.
//!
//! Handlers return [`AppError`]; its [`IntoResponse`] impl renders the
//! `{ "error": <message>, "code": <CODE> }` envelope with the mapped status.
//! Database errors are classified here so that constraint violations raised
//! by the schema surface with the same messages as the application-level
//! pre-checks they backstop.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptlib_core::error::CoreError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain error from `promptlib_core` (validation, conflict, auth).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, machine code, and user-facing message for one response.
type Rendered = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => render_core_error(core),
            AppError::Database(err) => render_sqlx_error(err),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn render_core_error(core: &CoreError) -> Rendered {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Classify a sqlx error.
///
/// `RowNotFound` maps to 404. Unique violations (23505) on the `uq_*`
/// indexes map to 409 with the same message the corresponding pre-check
/// would have produced, so losing the check-then-act race is invisible to
/// the client. Foreign-key violations (23503) on `prompt_tags` mean the
/// request named a tag that does not exist. Everything else is logged and
/// sanitized to a generic 500.
fn render_sqlx_error(err: &sqlx::Error) -> Rendered {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        let constraint = db_err.constraint().unwrap_or_default();
        match db_err.code().as_deref() {
            // Unique violation.
            Some("23505") if constraint.starts_with("uq_") => {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    conflict_message(constraint).to_string(),
                );
            }
            // Foreign-key violation from a tag-association insert.
            Some("23503") if constraint.starts_with("prompt_tags_tag_id") => {
                return (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "One or more tag ids do not exist".to_string(),
                );
            }
            _ => {}
        }
    }

    tracing::error!(error = %err, "Database error");
    internal()
}

/// Message for a unique-index violation, matching the pre-check wording
/// where one exists.
fn conflict_message(constraint: &str) -> &'static str {
    match constraint {
        "uq_tags_slug" => "Slug already exists",
        "uq_tags_name" => "Tag name already exists",
        "uq_profiles_username" => "Username already exists",
        _ => "Duplicate value",
    }
}

fn internal() -> Rendered {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
