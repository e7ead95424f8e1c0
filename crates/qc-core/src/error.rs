//! Unified error type for quickcut.
//!
//! All crates funnel their failures into [`Error`], which carries enough
//! context for API handlers to derive an HTTP status code via
//! [`Error::http_status`].

/// Unified error type covering all failure modes in quickcut.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data was missing or malformed (bad path, no segments).
    #[error("{0}")]
    InvalidInput(String),

    /// A segment boundary could not be parsed as a timecode.
    #[error("Bad timecode: {0:?}")]
    BadTimecode(String),

    /// A `Range` header could not be satisfied for the file.
    #[error("Range not satisfiable: {header:?} (file size {size})")]
    UnsatisfiableRange {
        /// The raw header value.
        header: String,
        /// Size of the file the range was resolved against.
        size: u64,
    },

    /// An external tool (ffmpeg, touch, SetFile, ...) failed.
    #[error("{tool} failed: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description, usually the tool's stderr.
        message: String,
    },

    /// Setting a file timestamp failed. Never surfaced to API callers.
    #[error("Failed to set {kind} time on {path}: {message}")]
    TimestampSet {
        /// Which timestamp ("modification" or "birth").
        kind: &'static str,
        /// File whose timestamp was being set.
        path: String,
        /// Underlying failure.
        message: String,
    },

    /// Moving the source file to the OS trash failed.
    #[error("trash failed: {0}")]
    Trash(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidInput(_) => 400,
            Error::BadTimecode(_) => 400,
            Error::UnsatisfiableRange { .. } => 416,
            Error::Tool { .. } => 500,
            Error::TimestampSet { .. } => 500,
            Error::Trash(_) => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput(_) => "invalid_input",
            Error::BadTimecode(_) => "bad_timecode",
            Error::UnsatisfiableRange { .. } => "range_not_satisfiable",
            Error::Tool { .. } => "tool_error",
            Error::TimestampSet { .. } => "timestamp_error",
            Error::Trash(_) => "trash_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
