pub mod admin;
pub mod auth;
pub mod health;
pub mod prompts;
pub mod root;
pub mod tags;

use axum::routing::{get, put};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                              login (public)
/// /auth/refresh                            refresh (public)
/// /auth/logout                             logout (requires auth)
/// /auth/change-password                    change own password (requires auth)
/// /auth/callback                           OAuth callback redirect (public)
///
/// /prompts                                 public listing (GET)
/// /prompts/{id}                            public detail (GET)
/// /prompts/{id}/view                       bump view counter (POST)
/// /prompts/{id}/copy                       record copy event (POST)
///
/// /tags                                    list tags (GET)
/// /tags/stats                              tags with prompt counts (GET)
/// /tags/popular                            most-used tags (GET)
/// /tags/slug/{slug}                        lookup by slug (GET)
/// /tags/{id}                               lookup by id (GET)
///
/// /settings                                effective site settings (GET)
///
/// /users/me                                own-profile update (PUT, requires auth)
///
/// /admin/prompts                           list, create (admin only)
/// /admin/prompts/{id}                      get, update, delete
/// /admin/prompts/{id}/toggle               flip visibility (POST)
/// /admin/tags                              create (POST)
/// /admin/tags/{id}                         update, delete
/// /admin/users                             list, create
/// /admin/users/stats                       aggregate counts (GET)
/// /admin/users/{id}                        get, update
/// /admin/users/{id}/ban                    ban (POST)
/// /admin/users/{id}/unban                  unban (POST)
/// /admin/users/{id}/reset-password         reset password (POST)
/// /admin/copy-stats                        copy statistics (GET)
/// /admin/copy-events                       copy-event log (GET)
/// /admin/copy-events/export                CSV export (GET)
/// /admin/settings                          update settings (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/prompts", prompts::router())
        .nest("/tags", tags::router())
        .nest("/admin", admin::router())
        .route("/settings", get(handlers::settings::get_settings))
        .route("/users/me", put(handlers::users::update_own_profile))
}
