//! qc-server: local HTTP service for previewing and cutting video.
//!
//! This crate ties the other qc-* crates into a running server. It provides:
//!
//! - Byte-range streaming of local files for the browser preview player
//! - The segment export endpoint backed by [`qc_export::SegmentExporter`]
//! - Desktop helpers (reveal in file manager, native file picker)
//! - Graceful shutdown via signal handling

pub mod context;
pub mod error;
pub mod router;
pub mod routes;
pub mod streaming;

use std::net::SocketAddr;
use std::sync::Arc;

use qc_core::config::Config;

use crate::context::AppContext;

/// Start the quickcut server.
///
/// Discovers external tools, builds the [`AppContext`] and serves the router
/// until SIGINT or SIGTERM is received.
pub async fn start(config: Config) -> qc_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let tools = Arc::new(qc_av::ToolRegistry::discover(&config.tools));
    for info in tools.check_all() {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::debug!("Tool not found: {}", info.name);
        }
    }
    if tools.get(qc_av::tools::FFMPEG).is_none() {
        tracing::warn!("ffmpeg not found; every cut will fail until it is installed");
    }

    let addr = resolve_addr(&config.server.host, config.server.port).await?;
    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::new(config, tools);
    tracing::info!("Export pool: {} workers", ctx.exporter.max_workers());

    let app = router::build_router(ctx, static_dir);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| qc_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("quickcut listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Resolve `host:port`, accepting hostnames such as `localhost`.
async fn resolve_addr(host: &str, port: u16) -> qc_core::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await
        .map_err(|e| qc_core::Error::Internal(format!("Invalid server address {host}:{port}: {e}")))?
        .next()
        .ok_or_else(|| qc_core::Error::Internal(format!("No address for {host}:{port}")))
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
