//! # qc-export
//!
//! Turns one source video plus a list of marked time ranges into one
//! lossless-cut file per range.
//!
//! Every exported file carries synthetic timestamps derived from the
//! source's birth time: a clip that starts three minutes into the original
//! recording is stamped as created three minutes after the original, and
//! as last modified at the instant its range ends.
//!
//! - [`plan`] -- output naming and per-segment timestamp arithmetic (pure).
//! - [`exporter`] -- the bounded-parallel [`SegmentExporter`].

pub mod exporter;
pub mod plan;

pub use exporter::{default_workers, ExportReport, SegmentExporter, SegmentOutcome};
pub use plan::{creation_epoch, ExportJob, ExportPlan, PlannedSegment, Segment, SegmentTimes};
