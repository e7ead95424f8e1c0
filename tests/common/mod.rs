//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which builds an [`AppContext`] with a fake cutter
//! and a recording trash backend, so no test needs ffmpeg installed or
//! touches the real trash. The [`TestHarness::with_server`] constructor starts
//! Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use qc_av::{CutRequest, SegmentCutter, ToolRegistry, Trasher};
use qc_core::config::Config;
use qc_server::context::AppContext;
use qc_server::router::build_router;

/// Valid timecode that [`FakeCutter`] treats as a tool failure.
pub const FAILING_START: &str = "9:99";

/// Cutter that writes a fixed payload instead of running ffmpeg.
///
/// A segment starting at [`FAILING_START`] makes the cut fail the way a
/// non-zero ffmpeg exit would.
#[derive(Default)]
pub struct FakeCutter {
    pub requests: Mutex<Vec<CutRequest>>,
}

#[async_trait]
impl SegmentCutter for FakeCutter {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn cut(&self, req: &CutRequest) -> qc_core::Result<()> {
        self.requests.lock().unwrap().push(req.clone());
        if req.start == FAILING_START {
            return Err(qc_core::Error::tool("ffmpeg", "exited with status 1: boom"));
        }
        tokio::fs::write(&req.output, format!("{}-{}", req.start, req.end)).await?;
        Ok(())
    }
}

/// Trash backend that records calls and optionally fails.
#[derive(Default)]
pub struct FakeTrash {
    pub calls: AtomicUsize,
    pub fail: bool,
}

#[async_trait]
impl Trasher for FakeTrash {
    async fn trash(&self, _path: &Path) -> qc_core::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(qc_core::Error::Trash("disk says no".into()))
        } else {
            Ok(())
        }
    }
}

pub struct TestHarness {
    pub ctx: AppContext,
    pub cutter: Arc<FakeCutter>,
    pub trash: Arc<FakeTrash>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_trash(FakeTrash::default())
    }

    pub fn with_trash(trash: FakeTrash) -> Self {
        let cutter = Arc::new(FakeCutter::default());
        let trash = Arc::new(trash);
        let ctx = AppContext::with_backends(
            Config::default(),
            Arc::new(ToolRegistry::default()),
            cutter.clone(),
            trash.clone(),
        );
        Self { ctx, cutter, trash }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::new().serve(None).await
    }

    /// Serve this harness, optionally with a static directory.
    pub async fn serve(self, static_dir: Option<PathBuf>) -> (Self, SocketAddr) {
        let app = build_router(self.ctx.clone(), static_dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (self, addr)
    }

    pub fn cut_count(&self) -> usize {
        self.cutter.requests.lock().unwrap().len()
    }

    pub fn trash_count(&self) -> usize {
        self.trash.calls.load(Ordering::SeqCst)
    }
}

/// Write `len` bytes of a repeating 0..=255 pattern to `dir/name`.
pub fn fixture_file(dir: &Path, name: &str, len: usize) -> (PathBuf, Vec<u8>) {
    let path = dir.join(name);
    let data: Vec<u8> = (0..=255u8).cycle().take(len).collect();
    std::fs::write(&path, &data).unwrap();
    (path, data)
}
