//! Segment export endpoint.

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use qc_export::{ExportJob, ExportReport, Segment};

use crate::context::AppContext;
use crate::error::AppError;

/// Body of `POST /api/cut`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CutBody {
    pub path: String,
    pub segments: Vec<Segment>,
    pub trash_original: bool,
}

#[derive(Debug, Serialize)]
pub struct CutResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: ExportReport,
}

/// POST /api/cut
///
/// The body is parsed as JSON regardless of `Content-Type`. Per-segment
/// failures are reported inside a `200 {ok: true}` envelope.
pub async fn cut_segments(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<Json<CutResponse>, AppError> {
    let body: CutBody = serde_json::from_slice(&body)
        .map_err(|e| qc_core::Error::invalid_input(format!("Malformed JSON: {e}")))?;

    let job = ExportJob {
        source: PathBuf::from(body.path),
        segments: body.segments,
        trash_original: body.trash_original,
    };

    let report = ctx.exporter.export(&job).await?;
    Ok(Json(CutResponse { ok: true, report }))
}
