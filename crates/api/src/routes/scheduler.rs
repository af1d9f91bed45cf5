//! Route definitions for the `/scheduler` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::scheduler;
use crate::state::AppState;

/// ```text
/// POST /cron-preview -> cron_preview
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/cron-preview", post(scheduler::cron_preview))
}
