//! Best-effort file timestamp updates for exported segments.
//!
//! Modification time goes through `touch -t` when available, otherwise a
//! direct `utimes`-style call. Birth time can only be set on macOS, and only
//! when `SetFile` is installed; elsewhere it is a no-op.

use std::path::Path;

use filetime::FileTime;
use qc_core::timecode;
use qc_core::Error;

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, SETFILE, TOUCH};

fn timestamp_error(kind: &'static str, path: &Path, message: impl ToString) -> Error {
    Error::TimestampSet {
        kind,
        path: path.display().to_string(),
        message: message.to_string(),
    }
}

/// Set the modification time of `path` to `epoch`.
pub async fn set_modified(tools: &ToolRegistry, path: &Path, epoch: i64) -> qc_core::Result<()> {
    if let Some(touch) = tools.get(TOUCH) {
        let mut cmd = ToolCommand::new(touch.path.clone());
        // -c: never create the file.
        cmd.args(["-c", "-t"]).arg(timecode::format_touch(epoch));
        cmd.arg(path.to_string_lossy());
        return cmd
            .execute()
            .await
            .map(|_| ())
            .map_err(|e| timestamp_error("modification", path, e));
    }

    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        filetime::set_file_mtime(&path, FileTime::from_unix_time(epoch, 0))
            .map_err(|e| timestamp_error("modification", &path, e))
    })
    .await
    .map_err(|e| Error::Internal(format!("spawn_blocking join error: {e}")))?
}

/// Set the birth (creation) time of `path` to `epoch`.
///
/// Returns `Ok(false)` when the platform or toolset cannot do it.
pub async fn set_birth(tools: &ToolRegistry, path: &Path, epoch: i64) -> qc_core::Result<bool> {
    if !cfg!(target_os = "macos") {
        return Ok(false);
    }
    let Some(setfile) = tools.get(SETFILE) else {
        return Ok(false);
    };

    let mut cmd = ToolCommand::new(setfile.path.clone());
    cmd.arg("-d").arg(timecode::format_setfile(epoch));
    cmd.arg(path.to_string_lossy());
    cmd.execute()
        .await
        .map(|_| true)
        .map_err(|e| timestamp_error("birth", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn mtime_secs(path: &Path) -> i64 {
        std::fs::metadata(path)
            .unwrap()
            .modified()
            .unwrap()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64
    }

    #[tokio::test]
    async fn direct_fallback_sets_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.mp4");
        std::fs::write(&path, b"data").unwrap();

        set_modified(&ToolRegistry::default(), &path, 1_600_000_000)
            .await
            .unwrap();
        assert_eq!(mtime_secs(&path), 1_600_000_000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn touch_sets_mtime() {
        let Ok(touch) = which::which("touch") else {
            return;
        };
        let mut tools = ToolRegistry::default();
        tools.insert(TOUCH, touch);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.mp4");
        std::fs::write(&path, b"data").unwrap();

        set_modified(&tools, &path, 1_700_000_015).await.unwrap();
        assert_eq!(mtime_secs(&path), 1_700_000_015);
    }

    #[tokio::test]
    async fn missing_file_is_timestamp_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.mp4");

        let err = set_modified(&ToolRegistry::default(), &path, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::TimestampSet { kind: "modification", .. }));
    }

    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn birth_time_is_noop_off_macos() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("part.mp4");
        std::fs::write(&path, b"data").unwrap();

        let applied = set_birth(&ToolRegistry::default(), &path, 1000).await.unwrap();
        assert!(!applied);
    }
}
