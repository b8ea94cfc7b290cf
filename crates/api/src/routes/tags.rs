//! Route definitions for the public `/tags` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET /              -> list_tags
/// GET /stats         -> tag_stats
/// GET /popular       -> popular_tags
/// GET /slug/{slug}   -> get_tag_by_slug
/// GET /{id}          -> get_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags))
        .route("/stats", get(tags::tag_stats))
        .route("/popular", get(tags::popular_tags))
        .route("/slug/{slug}", get(tags::get_tag_by_slug))
        .route("/{id}", get(tags::get_tag))
}
