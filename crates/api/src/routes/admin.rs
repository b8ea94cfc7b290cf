//! Route definitions for the `/admin` back-office. Every handler behind this
//! router gates itself with [`crate::middleware::rbac::RequireAdmin`].

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{copy_events, prompts, settings, tags, users};
use crate::state::AppState;

/// Routes mounted at `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        // Prompts
        .route(
            "/prompts",
            get(prompts::admin_list_prompts).post(prompts::create_prompt),
        )
        .route(
            "/prompts/{id}",
            get(prompts::admin_get_prompt)
                .put(prompts::update_prompt)
                .delete(prompts::delete_prompt),
        )
        .route("/prompts/{id}/toggle", post(prompts::toggle_prompt))
        // Tags
        .route("/tags", post(tags::create_tag))
        .route("/tags/{id}", put(tags::update_tag).delete(tags::delete_tag))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/stats", get(users::user_stats))
        .route("/users/{id}", get(users::get_user).put(users::update_user))
        .route("/users/{id}/ban", post(users::ban_user))
        .route("/users/{id}/unban", post(users::unban_user))
        .route("/users/{id}/reset-password", post(users::reset_password))
        // Copy analytics
        .route("/copy-stats", get(copy_events::copy_stats))
        .route("/copy-events", get(copy_events::list_copy_events))
        .route("/copy-events/export", get(copy_events::export_copy_events))
        // Settings
        .route("/settings", put(settings::update_settings))
}
