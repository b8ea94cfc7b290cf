//! Route definitions for the public `/prompts` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{copy_events, prompts};
use crate::state::AppState;

/// Routes mounted at `/prompts`.
///
/// ```text
/// GET  /            -> list_prompts (public only)
/// GET  /{id}        -> get_prompt (public only)
/// POST /{id}/view   -> view_prompt
/// POST /{id}/copy   -> copy_prompt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(prompts::list_prompts))
        .route("/{id}", get(prompts::get_prompt))
        .route("/{id}/view", post(prompts::view_prompt))
        .route("/{id}/copy", post(copy_events::copy_prompt))
}
