//! Root-level routes outside the `/api/v1` tree: the sitemap and the
//! debug prompt listing.

use axum::routing::get;
use axum::Router;

use crate::handlers::{debug, sitemap};
use crate::state::AppState;

/// Routes mounted at the application root.
///
/// ```text
/// GET /sitemap.xml        -> sitemap
/// GET /api/debug-prompts  -> debug_prompts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sitemap.xml", get(sitemap::sitemap))
        .route("/api/debug-prompts", get(debug::debug_prompts))
}
