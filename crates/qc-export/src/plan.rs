//! Export planning: job validation, output naming, and segment timestamps.
//!
//! Nothing here touches a subprocess. Planning is deterministic given the
//! source path, the submitted segments, and the source's creation epoch.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use qc_core::{timecode, Error, Result};

/// Extension used when the source file has none.
const DEFAULT_EXTENSION: &str = "mp4";

/// One marked time range, as submitted. Missing bounds deserialize as
/// empty strings and fail later as bad timecodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Segment {
    pub start: String,
    pub end: String,
}

impl Segment {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A request to cut `segments` out of `source`.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub source: PathBuf,
    pub segments: Vec<Segment>,
    /// Move `source` to the trash once every segment succeeds.
    pub trash_original: bool,
}

impl ExportJob {
    /// Reject jobs that cannot start: missing source or no segments.
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() || !self.source.is_file() {
            return Err(Error::invalid_input("Invalid path"));
        }
        if self.segments.is_empty() {
            return Err(Error::invalid_input("No segments"));
        }
        Ok(())
    }
}

fn epoch_secs(t: SystemTime) -> i64 {
    DateTime::<Utc>::from(t).timestamp()
}

/// Birth time of `path` in epoch seconds, or its modification time where
/// the filesystem does not record birth times.
pub fn creation_epoch(path: &Path) -> Result<i64> {
    let meta = std::fs::metadata(path)?;
    let t = match meta.created() {
        Ok(t) => t,
        Err(_) => meta.modified()?,
    };
    Ok(epoch_secs(t))
}

/// Synthetic timestamps for one exported segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentTimes {
    /// Source creation epoch plus the segment start offset.
    pub creation_epoch: i64,
    /// Source creation epoch plus the segment end offset, never earlier
    /// than `creation_epoch`.
    pub modified_epoch: i64,
}

impl SegmentTimes {
    /// Offset `baseline` by the parsed `start` and `end` timecodes.
    ///
    /// # Errors
    ///
    /// [`Error::BadTimecode`] when a timecode does not parse or lands past
    /// the year 9999.
    pub fn compute(baseline: i64, start: &str, end: &str) -> Result<Self> {
        let creation_epoch = shifted(baseline, start)?;
        let modified_epoch = shifted(baseline, end)?.max(creation_epoch);
        Ok(Self {
            creation_epoch,
            modified_epoch,
        })
    }

    /// `creation_time` tag value for the container.
    pub fn creation_time_iso(&self) -> String {
        timecode::format_iso_utc(self.creation_epoch)
    }

    pub fn birth_display(&self) -> String {
        timecode::format_local_display(self.creation_epoch)
    }

    pub fn modified_display(&self) -> String {
        timecode::format_local_display(self.modified_epoch)
    }
}

/// Last year a segment timestamp may fall in.
const MAX_YEAR: i32 = 9999;

fn shifted(baseline: i64, tc: &str) -> Result<i64> {
    let secs = timecode::parse(tc)?;
    i64::try_from(secs)
        .ok()
        .and_then(|secs| baseline.checked_add(secs))
        .filter(|epoch| {
            DateTime::from_timestamp(*epoch, 0).is_some_and(|t| t.year() <= MAX_YEAR)
        })
        .ok_or_else(|| Error::BadTimecode(tc.to_string()))
}

/// One segment with its trimmed timecodes and resolved output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedSegment {
    /// 1-based position in the submitted list.
    pub index: usize,
    pub start: String,
    pub end: String,
    pub output: PathBuf,
}

/// Where every segment of a job will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub output_dir: PathBuf,
    /// True when `output_dir` is a dedicated `{stem}_cuts` directory that
    /// must be created before cutting.
    pub dedicated_dir: bool,
    pub segments: Vec<PlannedSegment>,
}

impl ExportPlan {
    /// Lay out outputs for `segments` cut from `source`.
    ///
    /// A single segment lands beside the source as
    /// `{stem}__{start}-{end}.{ext}`; several land in `{stem}_cuts/` as
    /// `{stem}_partNN__{start}-{end}.{ext}`.
    pub fn new(source: &Path, segments: &[Segment]) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        // Outputs keep the source container rather than always writing mp4.
        let ext = source
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
        let base_dir = source.parent().map(Path::to_path_buf).unwrap_or_default();

        let dedicated_dir = segments.len() > 1;
        let output_dir = if dedicated_dir {
            base_dir.join(format!("{stem}_cuts"))
        } else {
            base_dir
        };

        let segments = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| {
                let index = i + 1;
                let start = seg.start.trim().to_string();
                let end = seg.end.trim().to_string();
                let range = format!(
                    "{}-{}",
                    timecode::safe_for_filename(&start),
                    timecode::safe_for_filename(&end)
                );
                let file_name = if dedicated_dir {
                    format!("{stem}_part{index:02}__{range}.{ext}")
                } else {
                    format!("{stem}__{range}.{ext}")
                };
                PlannedSegment {
                    index,
                    start,
                    end,
                    output: output_dir.join(file_name),
                }
            })
            .collect();

        Self {
            output_dir,
            dedicated_dir,
            segments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_offset_from_baseline() {
        let t = SegmentTimes::compute(1000, "00:10", "00:20").unwrap();
        assert_eq!(t.creation_epoch, 1010);
        assert_eq!(t.modified_epoch, 1020);
    }

    #[test]
    fn end_before_start_clamps_modified() {
        let t = SegmentTimes::compute(1000, "1:00", "0:30").unwrap();
        assert_eq!(t.creation_epoch, 1060);
        assert_eq!(t.modified_epoch, 1060);
    }

    #[test]
    fn times_reject_bad_timecode() {
        assert!(matches!(
            SegmentTimes::compute(1000, "0:05", "soon"),
            Err(Error::BadTimecode(_))
        ));
    }

    #[test]
    fn times_reject_unrepresentable_dates() {
        assert!(matches!(
            SegmentTimes::compute(1000, "99999999999999", "99999999999999"),
            Err(Error::BadTimecode(tc)) if tc == "99999999999999"
        ));
        assert!(matches!(
            SegmentTimes::compute(1000, "0", &u64::MAX.to_string()),
            Err(Error::BadTimecode(_))
        ));
        assert!(matches!(
            SegmentTimes::compute(i64::MAX - 5, "10", "20"),
            Err(Error::BadTimecode(_))
        ));
    }

    #[test]
    fn clip_scenario() {
        let plan = ExportPlan::new(Path::new("/videos/clip.mp4"), &[Segment::new("0:05", "0:15")]);
        assert!(!plan.dedicated_dir);
        assert_eq!(plan.output_dir, PathBuf::from("/videos"));
        assert_eq!(
            plan.segments[0].output,
            PathBuf::from("/videos/clip__0-05-0-15.mp4")
        );

        let t = SegmentTimes::compute(1000, &plan.segments[0].start, &plan.segments[0].end)
            .unwrap();
        assert_eq!(t.creation_epoch, 1005);
        assert_eq!(t.modified_epoch, 1015);
        assert_eq!(t.creation_time_iso(), "1970-01-01T00:16:45Z");
    }

    #[test]
    fn multiple_segments_use_cuts_dir() {
        let segments = vec![
            Segment::new("0:00", "0:10"),
            Segment::new("1:00", "1:30"),
            Segment::new("01:00:00", "01:00:05"),
        ];
        let plan = ExportPlan::new(Path::new("/videos/trip.mov"), &segments);

        assert!(plan.dedicated_dir);
        assert_eq!(plan.output_dir, PathBuf::from("/videos/trip_cuts"));
        let names: Vec<String> = plan
            .segments
            .iter()
            .map(|s| s.output.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "trip_part01__0-00-0-10.mov",
                "trip_part02__1-00-1-30.mov",
                "trip_part03__01-00-00-01-00-05.mov",
            ]
        );
        assert_eq!(
            plan.segments.iter().map(|s| s.index).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn timecodes_are_trimmed() {
        let plan = ExportPlan::new(Path::new("/v/a.mp4"), &[Segment::new(" 5 ", "10\n")]);
        assert_eq!(plan.segments[0].start, "5");
        assert_eq!(plan.segments[0].end, "10");
        assert_eq!(plan.segments[0].output, PathBuf::from("/v/a__5-10.mp4"));
    }

    #[test]
    fn missing_extension_defaults_to_mp4() {
        let plan = ExportPlan::new(Path::new("/v/raw"), &[Segment::new("0", "1")]);
        assert_eq!(plan.segments[0].output, PathBuf::from("/v/raw__0-1.mp4"));
    }

    #[test]
    fn validate_rejects_missing_source() {
        let job = ExportJob {
            source: PathBuf::from("/nonexistent/clip.mp4"),
            segments: vec![Segment::new("0", "1")],
            trash_original: false,
        };
        assert!(matches!(job.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn validate_rejects_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        let job = ExportJob {
            source: dir.path().to_path_buf(),
            segments: vec![Segment::new("0", "1")],
            trash_original: false,
        };
        assert!(job.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_segments() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"x").unwrap();
        let job = ExportJob {
            source,
            segments: vec![],
            trash_original: false,
        };
        let err = job.validate().unwrap_err();
        assert_eq!(err.to_string(), "No segments");
    }

    #[test]
    fn creation_epoch_of_fresh_file_is_recent() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"x").unwrap();

        let now = Utc::now().timestamp();
        let epoch = creation_epoch(&source).unwrap();
        assert!((now - epoch).abs() < 60, "epoch {epoch} vs now {now}");
    }

    #[test]
    fn segment_deserializes_from_json() {
        let seg: Segment = serde_json::from_str(r#"{"start":"0:05","end":"0:15"}"#).unwrap();
        assert_eq!(seg, Segment::new("0:05", "0:15"));

        let partial: Segment = serde_json::from_str(r#"{"start":"0:05"}"#).unwrap();
        assert_eq!(partial.end, "");
    }
}
