//! Response shapes and builders shared by API handlers.
//!
//! Non-paginated payloads are wrapped in a `{ "data": ... }` envelope.
//! Paginated responses carry their own metadata shape (`PromptPage` and
//! friends) and are returned unwrapped. Non-JSON surfaces (the CSV export
//! and the sitemap) use the builders below.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// A CSV download served with an attachment disposition.
pub fn csv_attachment(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

/// An XML document response.
pub fn xml_document(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/xml")],
        body,
    )
        .into_response()
}
