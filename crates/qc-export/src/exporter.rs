//! Parallel segment export with per-segment failure isolation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;

use qc_av::{stamp, CutRequest, SegmentCutter, ToolRegistry, Trasher};
use qc_core::{Error, Result};

use crate::plan::{creation_epoch, ExportJob, ExportPlan, PlannedSegment, SegmentTimes};

/// Minimum worker pool size, regardless of CPU count.
const MIN_WORKERS: usize = 4;

/// Logical CPU count, but never fewer than four workers.
pub fn default_workers() -> usize {
    num_cpus::get().max(MIN_WORKERS)
}

/// Result entry for one segment (or for the trash step).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentOutcome {
    pub ok: bool,
    /// 1-based submission index; absent on the trash entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// UTC ISO-8601 value embedded as container metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<String>,
    /// Local display string of the synthetic birth time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
    /// Local display string of the synthetic modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SegmentOutcome {
    fn success(index: usize, output: &Path, times: &SegmentTimes) -> Self {
        Self {
            ok: true,
            segment: Some(index),
            output: Some(output.to_string_lossy().to_string()),
            creation_time: Some(times.creation_time_iso()),
            birth: Some(times.birth_display()),
            modified: Some(times.modified_display()),
            error: None,
        }
    }

    fn failure(index: Option<usize>, error: impl ToString) -> Self {
        Self {
            ok: false,
            segment: index,
            output: None,
            creation_time: None,
            birth: None,
            modified: None,
            error: Some(error.to_string()),
        }
    }
}

/// Consolidated outcome of one export job.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExportReport {
    /// One entry per segment in submission order, followed by a trash
    /// failure entry if the trash step failed.
    pub results: Vec<SegmentOutcome>,
    #[serde(rename = "trashedOriginal")]
    pub trashed_original: bool,
}

impl ExportReport {
    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(|r| r.ok)
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.ok).count()
    }
}

/// Cuts every segment of an [`ExportJob`] concurrently.
///
/// At most `max_workers` cuts run at once. A failing segment produces a
/// failed [`SegmentOutcome`] and never aborts its siblings.
#[derive(Clone)]
pub struct SegmentExporter {
    cutter: Arc<dyn SegmentCutter>,
    trasher: Arc<dyn Trasher>,
    tools: Arc<ToolRegistry>,
    max_workers: usize,
}

impl SegmentExporter {
    pub fn new(
        cutter: Arc<dyn SegmentCutter>,
        trasher: Arc<dyn Trasher>,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            cutter,
            trasher,
            tools,
            max_workers: default_workers(),
        }
    }

    /// Override the pool size. `0` keeps the default.
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        if max_workers > 0 {
            self.max_workers = max_workers;
        }
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Run the job to completion.
    ///
    /// # Errors
    ///
    /// Only job-level problems are errors: [`Error::InvalidInput`] for a
    /// missing source or empty segment list, and I/O errors reading the
    /// source metadata or creating the `_cuts` directory. Everything that
    /// goes wrong with an individual segment is reported in the
    /// [`ExportReport`].
    pub async fn export(&self, job: &ExportJob) -> Result<ExportReport> {
        job.validate()?;

        let baseline = creation_epoch(&job.source)?;
        let plan = ExportPlan::new(&job.source, &job.segments);

        tracing::info!(
            source = %job.source.display(),
            segments = plan.segments.len(),
            workers = self.max_workers,
            "Starting export"
        );

        if plan.dedicated_dir {
            tokio::fs::create_dir_all(&plan.output_dir).await?;
        }

        let semaphore = Arc::new(Semaphore::new(self.max_workers));
        let source = Arc::new(job.source.clone());
        let mut handles = Vec::with_capacity(plan.segments.len());

        for planned in plan.segments {
            let sem = semaphore.clone();
            let cutter = self.cutter.clone();
            let tools = self.tools.clone();
            let source = source.clone();
            let index = planned.index;

            let handle = tokio::spawn(async move {
                let _permit = sem
                    .acquire_owned()
                    .await
                    .map_err(|e| Error::Internal(format!("worker pool closed: {e}")))?;
                export_segment(cutter.as_ref(), &tools, &source, baseline, &planned).await
            });
            handles.push((index, handle));
        }

        let mut report = ExportReport::default();
        for (index, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    tracing::warn!(segment = index, error = %e, "Segment export failed");
                    SegmentOutcome::failure(Some(index), e)
                }
                Err(e) => {
                    tracing::warn!(segment = index, error = %e, "Segment task panicked");
                    SegmentOutcome::failure(Some(index), format!("worker failed: {e}"))
                }
            };
            report.results.push(outcome);
        }

        if job.trash_original && report.all_succeeded() {
            match self.trasher.trash(&job.source).await {
                Ok(()) => report.trashed_original = true,
                Err(e) => {
                    tracing::warn!(source = %job.source.display(), error = %e, "Trash failed");
                    report.results.push(SegmentOutcome::failure(None, e));
                }
            }
        }

        tracing::info!(
            source = %job.source.display(),
            failures = report.failures(),
            trashed = report.trashed_original,
            "Export finished"
        );

        Ok(report)
    }
}

/// Cut one segment and stamp its timestamps.
async fn export_segment(
    cutter: &dyn SegmentCutter,
    tools: &ToolRegistry,
    source: &Path,
    baseline: i64,
    planned: &PlannedSegment,
) -> Result<SegmentOutcome> {
    let times = SegmentTimes::compute(baseline, &planned.start, &planned.end)?;

    let request = CutRequest {
        input: PathBuf::from(source),
        start: planned.start.clone(),
        end: planned.end.clone(),
        output: planned.output.clone(),
        creation_time: times.creation_time_iso(),
    };
    cutter.cut(&request).await?;

    if let Err(e) = stamp::set_modified(tools, &planned.output, times.modified_epoch).await {
        tracing::debug!("{e}");
    }
    if let Err(e) = stamp::set_birth(tools, &planned.output, times.creation_epoch).await {
        tracing::debug!("{e}");
    }

    Ok(SegmentOutcome::success(planned.index, &planned.output, &times))
}
