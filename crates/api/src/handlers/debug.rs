//! Debug endpoint mirroring the prompt listing with its interpreted
//! parameters echoed back.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use promptlib_core::types::DbId;
use promptlib_db::models::prompt::{PromptListParams, PromptWithMeta};
use promptlib_db::repositories::PromptRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

/// Query parameters for `GET /api/debug-prompts`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub tag_id: Option<DbId>,
    pub search: Option<String>,
}

/// Response body for the debug endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugPromptsResponse {
    pub success: bool,
    /// The interpreted query parameters, echoed back for inspection.
    pub debug: DebugParams,
    pub prompts: Vec<PromptWithMeta>,
    pub total: i64,
    pub current_page: i64,
    pub total_pages: i64,
}

/// GET /api/debug-prompts?page&limit&tagId&search
pub async fn debug_prompts(
    State(state): State<AppState>,
    Query(params): Query<DebugParams>,
) -> AppResult<impl IntoResponse> {
    let page = PromptRepo::list(
        &state.pool,
        &PromptListParams {
            page: params.page,
            limit: params.limit,
            tag_id: params.tag_id,
            search: params.search.clone(),
            ..PromptListParams::default()
        },
    )
    .await?;

    Ok(Json(DebugPromptsResponse {
        success: true,
        debug: params,
        prompts: page.prompts,
        total: page.total,
        current_page: page.current_page,
        total_pages: page.total_pages,
    }))
}
