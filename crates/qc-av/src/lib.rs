//! # qc-av
//!
//! External process integration for quickcut.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolRegistry`]) -- find and cache paths to ffmpeg,
//!   touch, SetFile and osascript.
//! - **Command execution** ([`ToolCommand`]) -- async builder with optional
//!   timeout for running external processes.
//! - **Segment cutting** ([`SegmentCutter`], [`FfmpegCutter`]) -- lossless
//!   stream-copy extraction of one time range.
//! - **Timestamp stamping** ([`stamp`]) -- best-effort modification and
//!   birth time updates on exported files.
//! - **Trash** ([`Trasher`], [`SystemTrash`]) -- move a file to the OS trash.
//! - **Desktop helpers** ([`desktop`]) -- reveal in file manager and the
//!   native file picker.

pub mod command;
pub mod cutter;
pub mod desktop;
pub mod stamp;
pub mod tools;
pub mod trash;

pub use command::{ToolCommand, ToolOutput};
pub use cutter::{CutRequest, FfmpegCutter, SegmentCutter};
pub use tools::{ToolConfig, ToolInfo, ToolRegistry};
pub use trash::{SystemTrash, Trasher};
