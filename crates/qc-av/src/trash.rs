//! Moving files to the OS trash / recycle bin.

use std::path::Path;

use async_trait::async_trait;

/// Moves a file to a recoverable trash location.
#[async_trait]
pub trait Trasher: Send + Sync {
    async fn trash(&self, path: &Path) -> qc_core::Result<()>;
}

/// [`Trasher`] using the platform trash (Finder, freedesktop, Recycle Bin).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTrash;

#[async_trait]
impl Trasher for SystemTrash {
    async fn trash(&self, path: &Path) -> qc_core::Result<()> {
        let path = path.to_path_buf();
        tracing::info!("Moving {:?} to trash", path);

        tokio::task::spawn_blocking(move || ::trash::delete(&path))
            .await
            .map_err(join_failure)?
            .map_err(|e| qc_core::Error::Trash(e.to_string()))
    }
}

fn join_failure(e: tokio::task::JoinError) -> qc_core::Error {
    qc_core::Error::Trash(format!("worker task ended: {e}"))
}
