//! Local file streaming for the preview player.

use std::path::PathBuf;

use axum::extract::Query;
use axum::http::{header, HeaderMap};
use axum::response::Response;
use serde::Deserialize;

use crate::error::AppError;
use crate::streaming;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    #[serde(default)]
    pub path: String,
}

/// GET /api/stream?path=P
pub async fn stream_file(
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = PathBuf::from(&query.path);
    if query.path.is_empty() || !path.is_file() {
        return Err(qc_core::Error::invalid_input("Invalid path").into());
    }

    let range_header = headers.get(header::RANGE).and_then(|v| v.to_str().ok());
    Ok(streaming::serve_file(&path, range_header).await?)
}
