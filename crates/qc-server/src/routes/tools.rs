//! External tool availability.

use axum::extract::State;
use axum::Json;

use crate::context::AppContext;

/// GET /api/tools
pub async fn list_tools(State(ctx): State<AppContext>) -> Json<Vec<qc_av::ToolInfo>> {
    Json(ctx.tools.check_all())
}
