//! Desktop integration: reveal in file manager and native file picker.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RevealBody {
    pub path: String,
}

/// POST /api/reveal
pub async fn reveal(body: Bytes) -> Result<Json<Value>, AppError> {
    let body: RevealBody = serde_json::from_slice(&body)
        .map_err(|e| qc_core::Error::invalid_input(format!("Malformed JSON: {e}")))?;

    let path = PathBuf::from(&body.path);
    if body.path.is_empty() || !path.exists() {
        return Err(qc_core::Error::invalid_input("Invalid path").into());
    }

    qc_av::desktop::reveal(&path).await?;
    Ok(Json(json!({ "ok": true })))
}

/// GET /api/choose-file
pub async fn choose_file(State(ctx): State<AppContext>) -> Result<Json<Value>, AppError> {
    let body = match qc_av::desktop::choose_file(&ctx.tools).await? {
        Some(path) => json!({ "ok": true, "path": path.to_string_lossy() }),
        None => json!({ "ok": false, "canceled": true }),
    };
    Ok(Json(body))
}
