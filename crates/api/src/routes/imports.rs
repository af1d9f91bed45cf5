//! Route definitions for the `/imports` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::imports;
use crate::state::AppState;

/// Routes mounted at `/imports`.
///
/// The second segment is a resource name for `validate` and a report id
/// everywhere else. The router needs one parameter name per position, so
/// both are declared as `{id}`.
///
/// ```text
/// GET  /                              -> list_imports
/// GET  /resources                     -> list_resources
/// GET  /resources/{resource}/template -> download_template
/// POST /{resource}/validate           -> validate_import
/// POST /{id}/commit                   -> commit_import
/// POST /{id}/cancel                   -> cancel_import
/// GET  /{id}/report                   -> get_report
/// GET  /{id}/report/csv               -> get_report_csv
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(imports::list_imports))
        .route("/resources", get(imports::list_resources))
        .route(
            "/resources/{resource}/template",
            get(imports::download_template),
        )
        .route("/{id}/validate", post(imports::validate_import))
        .route("/{id}/commit", post(imports::commit_import))
        .route("/{id}/cancel", post(imports::cancel_import))
        .route("/{id}/report", get(imports::get_report))
        .route("/{id}/report/csv", get(imports::get_report_csv))
}
