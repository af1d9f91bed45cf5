pub mod auth;
pub mod health;
pub mod imports;
pub mod scheduler;
pub mod type_assists;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
///
/// /imports                                     list reports (auth)
/// /imports/resources                           importable resources (auth)
/// /imports/resources/{resource}/template       CSV header template (auth)
/// /imports/{resource}/validate                 dry run + preview report (admin)
/// /imports/{id}/commit                         write a preview report (admin)
/// /imports/{id}/report                         report JSON (auth)
/// /imports/{id}/report/csv                     report CSV (auth)
///
/// /type-assists?tatype=                        lookup codes (auth)
///
/// /scheduler/cron-preview                      validate + next runs (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/imports", imports::router())
        .nest("/type-assists", type_assists::router())
        .nest("/scheduler", scheduler::router())
}
