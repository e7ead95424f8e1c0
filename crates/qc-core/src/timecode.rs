//! Timecode parsing and timestamp formatting.
//!
//! Segment boundaries arrive as human timecodes (`SS`, `MM:SS`,
//! `HH:MM:SS`). Exported files carry timestamps in three syntaxes:
//! `touch -t`, `SetFile -d`, and UTC ISO-8601 for the container's
//! `creation_time` tag.

use chrono::{DateTime, Local, Utc};

use crate::{Error, Result};

/// Parse a timecode string to whole seconds.
///
/// Supports `SS`, `MM:SS` and `HH:MM:SS`. Components are non-negative
/// integers and are not range-checked, so `"90"` and `"1:30"` are the same
/// instant.
///
/// # Examples
/// ```
/// use qc_core::timecode::parse;
/// assert_eq!(parse("01:30:00").unwrap(), 5400);
/// assert_eq!(parse("05:30").unwrap(), 330);
/// assert_eq!(parse("90").unwrap(), 90);
/// ```
pub fn parse(tc: &str) -> Result<u64> {
    let bad = || Error::BadTimecode(tc.to_string());

    let parts = tc
        .trim()
        .split(':')
        .map(|p| p.trim().parse::<u64>().map_err(|_| bad()))
        .collect::<Result<Vec<u64>>>()?;

    let total = match parts.as_slice() {
        [s] => Some(*s),
        [m, s] => m.checked_mul(60).and_then(|m| m.checked_add(*s)),
        [h, m, s] => h
            .checked_mul(3600)
            .and_then(|h| m.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*s)),
        _ => None,
    };

    total.ok_or_else(bad)
}

/// Make a timecode safe to embed in a file name (`01:30` -> `01-30`).
pub fn safe_for_filename(tc: &str) -> String {
    tc.replace(':', "-")
}

fn utc(epoch: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(epoch, 0).unwrap_or_default()
}

fn local(epoch: i64) -> DateTime<Local> {
    utc(epoch).with_timezone(&Local)
}

/// Local time as `YYYYMMDDHHMM.SS`, the `touch -t` syntax.
pub fn format_touch(epoch: i64) -> String {
    local(epoch).format("%Y%m%d%H%M.%S").to_string()
}

/// Local time as `MM/DD/YYYY HH:MM:SS`, the macOS `SetFile -d` syntax.
pub fn format_setfile(epoch: i64) -> String {
    local(epoch).format("%m/%d/%Y %H:%M:%S").to_string()
}

/// UTC as `YYYY-MM-DDTHH:MM:SSZ`, used for embedded `creation_time` metadata.
pub fn format_iso_utc(epoch: i64) -> String {
    utc(epoch).format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Local time as `YYYY-MM-DD HH:MM:SS` for display in API responses.
pub fn format_local_display(epoch: i64) -> String {
    local(epoch).format("%Y-%m-%d %H:%M:%S").to_string()
}
