//! Lossless segment extraction.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, FFMPEG};

/// Everything a cutter needs to extract one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutRequest {
    /// Source media file.
    pub input: PathBuf,
    /// Segment start timecode, passed through verbatim.
    pub start: String,
    /// Segment end timecode, passed through verbatim.
    pub end: String,
    /// Destination file; overwritten if it exists.
    pub output: PathBuf,
    /// UTC ISO-8601 value for the container `creation_time` tag.
    pub creation_time: String,
}

/// Extracts a time range from a media file without re-encoding.
#[async_trait]
pub trait SegmentCutter: Send + Sync {
    /// A short name for logs and error messages.
    fn name(&self) -> &'static str;

    /// Write the requested segment to `req.output`.
    ///
    /// Must fail if the output could not be produced.
    async fn cut(&self, req: &CutRequest) -> qc_core::Result<()>;
}

/// [`SegmentCutter`] backed by `ffmpeg -c copy`.
#[derive(Debug, Clone)]
pub struct FfmpegCutter {
    tools: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl FfmpegCutter {
    pub fn new(tools: Arc<ToolRegistry>, timeout: Option<Duration>) -> Self {
        Self { tools, timeout }
    }

    fn command(&self, req: &CutRequest) -> qc_core::Result<ToolCommand> {
        let ffmpeg = self.tools.require(FFMPEG)?;
        let mut cmd = ToolCommand::new(ffmpeg.path.clone());
        cmd.args(["-nostdin", "-hide_banner", "-loglevel", "error", "-y"]);
        cmd.args(["-ss", req.start.as_str(), "-to", req.end.as_str()]);
        cmd.arg("-i");
        cmd.arg(req.input.to_string_lossy());
        cmd.arg("-metadata");
        cmd.arg(format!("creation_time={}", req.creation_time));
        cmd.args(["-c", "copy"]);
        cmd.arg(req.output.to_string_lossy());
        cmd.timeout(self.timeout);
        Ok(cmd)
    }
}

#[async_trait]
impl SegmentCutter for FfmpegCutter {
    fn name(&self) -> &'static str {
        FFMPEG
    }

    async fn cut(&self, req: &CutRequest) -> qc_core::Result<()> {
        tracing::info!(
            "cut {:?} [{} -> {}] -> {:?}",
            req.input,
            req.start,
            req.end,
            req.output
        );
        self.command(req)?.execute().await?;
        Ok(())
    }
}
