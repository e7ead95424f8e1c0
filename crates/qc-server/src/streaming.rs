//! Byte-range resolution and chunked file serving.
//!
//! Files are streamed through `ReaderStream` over a `Take`, so memory stays
//! bounded at one chunk per response regardless of file size.

use std::path::Path;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use qc_core::{Error, Result};

/// Read size for streamed responses.
pub const STREAM_CHUNK_SIZE: usize = 1024 * 1024;

/// Inclusive byte window inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
}

impl ByteWindow {
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }
}

/// Split `s` into its leading ASCII digits and the remainder.
fn leading_digits(s: &str) -> (&str, &str) {
    let idx = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(idx)
}

/// Resolve a `Range` header value against a file of `size` bytes.
///
/// Accepts `bytes=S-E`, `bytes=S-` and `bytes=-N`. Only the first range of a
/// multi-range header is honoured. Values too large for `u64` saturate.
///
/// # Errors
///
/// [`Error::UnsatisfiableRange`] when the header is malformed, both bounds
/// are empty, a suffix length is zero, `S >= size`, `S > E`, or the file is
/// empty.
pub fn resolve_range(header: &str, size: u64) -> Result<ByteWindow> {
    let unsatisfiable = || Error::UnsatisfiableRange {
        header: header.to_string(),
        size,
    };

    if size == 0 {
        return Err(unsatisfiable());
    }

    let ranges = header.strip_prefix("bytes=").ok_or_else(unsatisfiable)?;
    let (first, rest) = leading_digits(ranges);
    let rest = rest.strip_prefix('-').ok_or_else(unsatisfiable)?;
    let (second, _) = leading_digits(rest);

    let number = |digits: &str| digits.parse::<u64>().unwrap_or(u64::MAX);

    match (first.is_empty(), second.is_empty()) {
        (true, true) => Err(unsatisfiable()),
        (true, false) => {
            let suffix = number(second);
            if suffix == 0 {
                return Err(unsatisfiable());
            }
            Ok(ByteWindow {
                start: size.saturating_sub(suffix),
                end: size - 1,
            })
        }
        (false, _) => {
            let start = number(first);
            let end = if second.is_empty() {
                size - 1
            } else {
                number(second)
            };
            if start >= size || start > end {
                return Err(unsatisfiable());
            }
            Ok(ByteWindow {
                start,
                end: end.min(size - 1),
            })
        }
    }
}

/// Guess the MIME type from the file extension.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "ts" => "video/mp2t",
        "wmv" => "video/x-ms-wmv",
        "flv" => "video/x-flv",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}

fn range_not_satisfiable(size: u64) -> Response {
    (
        StatusCode::RANGE_NOT_SATISFIABLE,
        [(header::CONTENT_RANGE, format!("bytes */{size}"))],
        Body::empty(),
    )
        .into_response()
}

/// Serve `path`, honouring an optional `Range` header.
///
/// Returns 200 for the whole file, 206 for a satisfiable range and 416 for
/// anything else. A read error mid-stream ends the body early; client
/// disconnects simply drop the stream.
pub async fn serve_file(path: &Path, range_header: Option<&str>) -> Result<Response> {
    let size = tokio::fs::metadata(path).await?.len();
    let content_type = guess_content_type(path);

    let window = match range_header {
        Some(value) => match resolve_range(value, size) {
            Ok(w) => Some(w),
            Err(e) => {
                tracing::debug!("{e}");
                return Ok(range_not_satisfiable(size));
            }
        },
        None => None,
    };

    let (status, start, length) = match window {
        Some(w) => (StatusCode::PARTIAL_CONTENT, w.start, w.len()),
        None => (StatusCode::OK, 0, size),
    };

    let mut file = tokio::fs::File::open(path).await?;
    if start > 0 {
        file.seek(std::io::SeekFrom::Start(start)).await?;
    }

    let stream = ReaderStream::with_capacity(file.take(length), STREAM_CHUNK_SIZE).take_while(
        |chunk| {
            if let Err(e) = chunk {
                tracing::trace!("Stream read ended early: {e}");
            }
            futures::future::ready(chunk.is_ok())
        },
    );
    let body = Body::from_stream(stream);

    let mut response = (
        status,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, length.to_string()),
            (header::ACCEPT_RANGES, "bytes".to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        body,
    )
        .into_response();

    if let Some(w) = window {
        if let Ok(value) = format!("bytes {}-{}/{size}", w.start, w.end).parse() {
            response.headers_mut().insert(header::CONTENT_RANGE, value);
        }
    }

    Ok(response)
}
