//! Handlers for the `/scheduler` resource.

use axum::Json;
use chrono::Utc;
use facility_core::error::CoreError;
use facility_core::scheduling::{upcoming, validate_cron_at};
use facility_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::validate_body;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;

const DEFAULT_PREVIEW_COUNT: usize = 5;

fn default_count() -> usize {
    DEFAULT_PREVIEW_COUNT
}

#[derive(Debug, Deserialize, Validate)]
pub struct CronPreviewRequest {
    #[validate(length(min = 1, max = 120))]
    pub cron_expression: String,
    /// Clamped to 1..=20.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Preview runs after this instant instead of now.
    pub after: Option<Timestamp>,
}

#[derive(Debug, Serialize)]
pub struct CronPreviewResponse {
    /// The expression as stored on a job (six or seven fields).
    pub normalized: String,
    pub next_runs: Vec<Timestamp>,
}

/// POST /api/v1/scheduler/cron-preview
///
/// Validate a schedule with the same rules task and tour imports apply, and
/// list its next run times.
pub async fn cron_preview(
    RequireAuth(_user): RequireAuth,
    Json(body): Json<CronPreviewRequest>,
) -> AppResult<Json<DataResponse<CronPreviewResponse>>> {
    validate_body(&body)?;
    let after = body.after.unwrap_or_else(Utc::now);

    let normalized = validate_cron_at(&body.cron_expression, after)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
    let next_runs = upcoming(&body.cron_expression, after, body.count)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    Ok(Json(DataResponse {
        data: CronPreviewResponse {
            normalized,
            next_runs,
        },
    }))
}
