//! Route definitions for the `/type-assists` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::type_assists;
use crate::state::AppState;

/// ```text
/// GET / -> list_type_assists
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(type_assists::list_type_assists))
}
