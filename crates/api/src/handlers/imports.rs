//! Handlers for the `/imports` resource.
//!
//! Validation is a dry run: rows go through the import pipeline and the
//! outcome is stored as a report in `preview` status. Commit writes the
//! accepted entries of that report in one transaction.

use axum::extract::{Path, Query, State};
use axum::http::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::Json;
use facility_core::error::CoreError;
use facility_core::import::columns::{template_header, templates, ResourceTemplate};
use facility_core::import::pipeline::ImportPipeline;
use facility_core::import::resource::{ImportMode, ResourceKind};
use facility_core::import::RawRow;
use facility_core::import_status::{commit_status, is_pending};
use facility_core::types::DbId;
use facility_core::validation::import_preview::ImportPreview;
use facility_db::models::import_report::{
    CreateImportReport, CreateImportReportEntry, ImportReport,
};
use facility_db::repositories::{ImportReportRepo, ImportWriteRepo};
use facility_db::resolver::PgReferenceResolver;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::validate_body;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

type CsvResponse = (StatusCode, [(HeaderName, String); 2], String);

fn parse_resource(segment: &str) -> AppResult<ResourceKind> {
    ResourceKind::parse(segment)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown import resource '{segment}'")))
}

fn report_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "ImportReport",
        id,
    })
}

fn not_pending(report: &ImportReport) -> AppError {
    AppError::Core(CoreError::Conflict(format!(
        "Import report {} is already {}",
        report.id, report.status
    )))
}

fn csv_response(filename: &str, body: String) -> CsvResponse {
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}

// ── Templates ────────────────────────────────────────────────────────

/// GET /api/v1/imports/resources
///
/// Describe every importable resource and its columns.
pub async fn list_resources(
    RequireAuth(_user): RequireAuth,
) -> AppResult<Json<DataResponse<Vec<ResourceTemplate>>>> {
    Ok(Json(DataResponse { data: templates() }))
}

/// GET /api/v1/imports/resources/{resource}/template
///
/// Download the header row of a resource's spreadsheet template.
pub async fn download_template(
    RequireAuth(_user): RequireAuth,
    Path(resource): Path<String>,
) -> AppResult<CsvResponse> {
    let kind = parse_resource(&resource)?;
    let body = format!("{}\n", template_header(kind));
    Ok(csv_response(&format!("{kind}_template.csv"), body))
}

// ── Validate ─────────────────────────────────────────────────────────

/// Request body for the validate endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct ValidateImportRequest {
    #[serde(default)]
    pub mode: ImportMode,
    /// Free-text origin of the rows, e.g. the uploaded file name.
    #[validate(length(max = 255))]
    pub source_reference: Option<String>,
    pub rows: Vec<RawRow>,
}

/// Stored report plus the full per-row preview.
#[derive(Debug, Serialize)]
pub struct ValidateImportResponse {
    pub report: ImportReport,
    pub preview: ImportPreview,
}

/// POST /api/v1/imports/{resource}/validate
///
/// Run the import pipeline over the submitted rows without writing any
/// entity, and persist the outcome as a `preview` report.
pub async fn validate_import(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Json(body): Json<ValidateImportRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ValidateImportResponse>>)> {
    validate_body(&body)?;
    let kind = parse_resource(&resource)?;

    let pipeline = ImportPipeline::new(
        kind,
        body.mode,
        user.client_id,
        state.config.import.clone(),
    );
    let mut resolver = PgReferenceResolver::new(state.pool.clone());
    let preview = pipeline.run(&mut resolver, &body.rows).await?;

    let entries = preview
        .entries()
        .into_iter()
        .map(CreateImportReportEntry::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::InternalError(format!("Failed to encode report entry: {e}")))?;
    let input = CreateImportReport::preview(
        kind,
        body.mode,
        user.client_id,
        body.source_reference,
        &preview,
        Some(user.user_id),
    );
    let report = ImportReportRepo::create_with_entries(&state.pool, &input, &entries).await?;

    tracing::info!(
        report_id = report.id,
        resource = %kind,
        mode = body.mode.as_str(),
        total = preview.total_records,
        create = preview.to_create.len(),
        update = preview.to_update.len(),
        skip = preview.to_skip.len(),
        invalid = preview.invalid.len(),
        lookups = resolver.cached_lookups(),
        "Import validated",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ValidateImportResponse { report, preview },
        }),
    ))
}

// ── Commit ───────────────────────────────────────────────────────────

/// Outcome of a commit.
#[derive(Debug, Serialize)]
pub struct CommitImportResponse {
    pub report: ImportReport,
    pub created: usize,
    pub updated: usize,
}

/// POST /api/v1/imports/{id}/commit
///
/// Write every accepted entry of a `preview` report. The report ends in
/// `committed` when no row was rejected and `partial` otherwise. Returns
/// 409 when the report is not in `preview`.
pub async fn commit_import(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<CommitImportResponse>>> {
    let report = ImportReportRepo::find_for_client(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;

    if !is_pending(&report.status) {
        return Err(not_pending(&report));
    }

    let kind = ResourceKind::parse(&report.resource).ok_or_else(|| {
        AppError::InternalError(format!("Stored report has unknown resource '{}'", report.resource))
    })?;
    let final_status = commit_status(report.rejected);

    let entries = ImportReportRepo::list_entries(&state.pool, report_id).await?;
    let summary = ImportWriteRepo::apply(
        &state.pool,
        report_id,
        kind,
        &entries,
        Some(user.user_id),
        final_status,
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "Import report {report_id} was committed concurrently"
        )))
    })?;

    let report = ImportReportRepo::find_for_client(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;

    Ok(Json(DataResponse {
        data: CommitImportResponse {
            report,
            created: summary.created,
            updated: summary.updated,
        },
    }))
}

/// POST /api/v1/imports/{id}/cancel
///
/// Discard a `preview` report without writing anything. Returns 409 when
/// the report is no longer in `preview`.
pub async fn cancel_import(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let report = ImportReportRepo::find_for_client(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;
    if !is_pending(&report.status) {
        return Err(not_pending(&report));
    }

    if !ImportReportRepo::cancel(&state.pool, report_id, user.client_id).await? {
        let current = ImportReportRepo::find_for_client(&state.pool, report_id, user.client_id)
            .await?
            .ok_or_else(|| report_not_found(report_id))?;
        return Err(not_pending(&current));
    }
    tracing::info!(report_id, user_id = user.user_id, "Import cancelled");

    let report = ImportReportRepo::find_for_client(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;
    Ok(Json(DataResponse { data: report }))
}

// ── Reports ──────────────────────────────────────────────────────────

/// Query parameters for listing import reports.
#[derive(Debug, Deserialize)]
pub struct ListImportsParams {
    pub resource: Option<String>,
}

/// GET /api/v1/imports?resource=X
///
/// List the caller's import reports, newest first.
pub async fn list_imports(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<ListImportsParams>,
) -> AppResult<Json<DataResponse<Vec<ImportReport>>>> {
    let resource = params.resource.as_deref().map(parse_resource).transpose()?;
    let reports = ImportReportRepo::list(
        &state.pool,
        user.client_id,
        resource.as_ref().map(ResourceKind::as_str),
    )
    .await?;
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/imports/{id}/report
///
/// Full report as JSON (metadata + all entries).
pub async fn get_report(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let report = ImportReportRepo::export_json(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /api/v1/imports/{id}/report/csv
///
/// Report entries as CSV.
pub async fn get_report_csv(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(report_id): Path<DbId>,
) -> AppResult<CsvResponse> {
    let csv = ImportReportRepo::export_csv(&state.pool, report_id, user.client_id)
        .await?
        .ok_or_else(|| report_not_found(report_id))?;
    Ok(csv_response(&format!("import_report_{report_id}.csv"), csv))
}
