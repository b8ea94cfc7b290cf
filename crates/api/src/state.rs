use std::sync::Arc;

use crate::config::ServerConfig;

/// State cloned into every handler via `State<AppState>`.
///
/// The pool is internally reference-counted and the config is behind an
/// `Arc`, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    pub pool: promptlib_db::DbPool,
    pub config: Arc<ServerConfig>,
}
