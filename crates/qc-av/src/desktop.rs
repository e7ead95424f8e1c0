//! Thin wrappers over the desktop shell: reveal a file in the file manager
//! and show the native open-file dialog.

use std::path::{Path, PathBuf};

use crate::command::ToolCommand;
use crate::tools::{ToolRegistry, OSASCRIPT};

/// Sentinel the picker script prints when the user presses Cancel.
const CANCELED: &str = "USER_CANCELED";

const CHOOSE_FILE_SCRIPT: &str = r#"
try
    set f to choose file with prompt "Select a video" of type {"mp4","mov","m4v"}
    POSIX path of f
on error number -128
    return "USER_CANCELED"
end try
"#;

/// Show `path` in the platform file manager.
///
/// macOS selects the file in Finder; Windows selects it in Explorer; other
/// platforms open the containing directory with `xdg-open`.
pub async fn reveal(path: &Path) -> qc_core::Result<()> {
    let mut cmd = reveal_command(path);

    match cmd.execute().await {
        Ok(_) => Ok(()),
        // explorer.exe exits 1 even when it succeeds.
        Err(qc_core::Error::Tool { message, .. })
            if cfg!(windows) && message.starts_with("exited with status") =>
        {
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn reveal_command(path: &Path) -> ToolCommand {
    if cfg!(target_os = "macos") {
        let mut cmd = ToolCommand::new(PathBuf::from("open"));
        cmd.arg("-R").arg(path.to_string_lossy());
        cmd
    } else if cfg!(windows) {
        let mut cmd = ToolCommand::new(PathBuf::from("explorer"));
        cmd.arg(format!("/select,{}", path.display()));
        cmd
    } else {
        let dir = path.parent().unwrap_or(path);
        let mut cmd = ToolCommand::new(PathBuf::from("xdg-open"));
        cmd.arg(dir.to_string_lossy());
        cmd
    }
}

/// Show the native open-file dialog (macOS only).
///
/// Returns `Ok(None)` when the user cancels.
///
/// # Errors
///
/// [`qc_core::Error::InvalidInput`] off macOS or when `osascript` is
/// missing; [`qc_core::Error::Tool`] when the script fails.
pub async fn choose_file(tools: &ToolRegistry) -> qc_core::Result<Option<PathBuf>> {
    if !cfg!(target_os = "macos") {
        return Err(qc_core::Error::invalid_input(
            "The native file picker is only available on macOS",
        ));
    }
    let osascript = tools
        .get(OSASCRIPT)
        .ok_or_else(|| qc_core::Error::invalid_input("osascript not found"))?;

    let mut cmd = ToolCommand::new(osascript.path.clone());
    cmd.arg("-e").arg(CHOOSE_FILE_SCRIPT);
    let output = cmd.execute().await?;

    parse_picker_output(&output.stdout)
}

fn parse_picker_output(stdout: &str) -> qc_core::Result<Option<PathBuf>> {
    match stdout.trim() {
        CANCELED => Ok(None),
        "" => Err(qc_core::Error::tool(OSASCRIPT, "no file returned")),
        path => Ok(Some(PathBuf::from(path))),
    }
}
