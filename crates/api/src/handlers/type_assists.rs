//! Handlers for the `/type-assists` resource.

use axum::extract::{Query, State};
use axum::Json;
use facility_db::models::type_assist::TypeAssist;
use facility_db::repositories::TypeAssistRepo;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ListTypeAssistsParams {
    /// Category filter, e.g. `ASSETTYPE`. Case-insensitive.
    pub tatype: Option<String>,
}

/// GET /api/v1/type-assists?tatype=X
///
/// Enabled lookup codes of the caller's client, for filling spreadsheet
/// drop-downs.
pub async fn list_type_assists(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListTypeAssistsParams>,
) -> AppResult<Json<DataResponse<Vec<TypeAssist>>>> {
    let items =
        TypeAssistRepo::list(&state.pool, user.client_id, params.tatype.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}
