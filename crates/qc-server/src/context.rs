//! Shared application context.
//!
//! [`AppContext`] is handed to every route handler through Axum state. All
//! members are immutable after start-up and wrapped in `Arc`s so cloning is
//! cheap.

use std::sync::Arc;
use std::time::Duration;

use qc_av::{FfmpegCutter, SegmentCutter, SystemTrash, ToolRegistry, Trasher};
use qc_core::config::Config;
use qc_export::SegmentExporter;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub tools: Arc<ToolRegistry>,
    pub exporter: Arc<SegmentExporter>,
}

impl AppContext {
    /// Build a context backed by ffmpeg and the platform trash.
    pub fn new(config: Config, tools: Arc<ToolRegistry>) -> Self {
        let timeout = config.export.cut_timeout_secs.map(Duration::from_secs);
        let cutter: Arc<dyn SegmentCutter> = Arc::new(FfmpegCutter::new(tools.clone(), timeout));
        Self::with_backends(config, tools, cutter, Arc::new(SystemTrash))
    }

    /// Build a context with explicit cutting and trash backends.
    pub fn with_backends(
        config: Config,
        tools: Arc<ToolRegistry>,
        cutter: Arc<dyn SegmentCutter>,
        trasher: Arc<dyn Trasher>,
    ) -> Self {
        let exporter = SegmentExporter::new(cutter, trasher, tools.clone())
            .with_max_workers(config.export.max_workers.unwrap_or(0));

        Self {
            config: Arc::new(config),
            tools,
            exporter: Arc::new(exporter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_worker_count_is_applied() {
        let mut config = Config::default();
        config.export.max_workers = Some(3);
        let ctx = AppContext::new(config, Arc::new(ToolRegistry::default()));
        assert_eq!(ctx.exporter.max_workers(), 3);
    }

    #[test]
    fn unset_worker_count_uses_default() {
        let ctx = AppContext::new(Config::default(), Arc::new(ToolRegistry::default()));
        assert_eq!(ctx.exporter.max_workers(), qc_export::default_workers());
    }
}
