//! Axum router construction.
//!
//! Builds the application router with the API routes, middleware layers,
//! and static file serving for the preview page.
//!
//! No CORS headers are emitted. The API reads and trashes arbitrary local
//! paths, so only same-origin pages served from here may read responses.

use std::path::PathBuf;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::routes;

/// Build the complete Axum router.
pub fn build_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let api = Router::new()
        .route("/stream", get(routes::stream::stream_file))
        .route("/cut", post(routes::cut::cut_segments))
        .route("/reveal", post(routes::desktop::reveal))
        .route("/choose-file", get(routes::desktop::choose_file))
        .route("/tools", get(routes::tools::list_tools));

    let mut app = Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Static file serving for the preview page.
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                tower_http::services::ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(tower_http::services::ServeFile::new(index_path)),
            );
        } else {
            tracing::debug!("Static directory {:?} not found, skipping", dir);
        }
    }

    app
}
