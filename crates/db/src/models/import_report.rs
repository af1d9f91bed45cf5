//! Import reports and their per-row entries.

use facility_core::import::resource::{ImportMode, ResourceKind};
use facility_core::import_status::IMPORT_STATUS_PREVIEW;
use facility_core::types::{DbId, Timestamp};
use facility_core::validation::import_preview::{ImportPreview, ImportPreviewEntry};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `import_reports` table, joined with its status name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportReport {
    pub id: DbId,
    pub status_id: DbId,
    /// Populated from `import_report_statuses.name` via JOIN.
    pub status: String,
    pub resource: String,
    pub mode: String,
    pub source_reference: Option<String>,
    pub client_id: DbId,
    pub total_records: i32,
    pub accepted: i32,
    pub rejected: i32,
    pub auto_corrected: i32,
    pub skipped: i32,
    pub created_by: Option<DbId>,
    pub committed_by: Option<DbId>,
    pub committed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an import report.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportReport {
    /// Looked up by name from `import_report_statuses`.
    pub status: String,
    pub resource: String,
    pub mode: String,
    pub source_reference: Option<String>,
    pub client_id: DbId,
    pub total_records: i32,
    pub accepted: i32,
    pub rejected: i32,
    pub auto_corrected: i32,
    pub skipped: i32,
    pub created_by: Option<DbId>,
}

/// A row from the `import_report_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ImportReportEntry {
    pub id: DbId,
    pub report_id: DbId,
    pub record_index: i32,
    pub record_key: Option<String>,
    pub entity_id: Option<DbId>,
    pub action: String,
    pub field_errors: serde_json::Value,
    pub field_warnings: serde_json::Value,
    pub field_diffs: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an import report entry.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateImportReportEntry {
    pub record_index: i32,
    pub record_key: Option<String>,
    pub entity_id: Option<DbId>,
    pub action: String,
    pub field_errors: serde_json::Value,
    pub field_warnings: serde_json::Value,
    pub field_diffs: serde_json::Value,
    pub payload: Option<serde_json::Value>,
}

impl CreateImportReport {
    /// Summarise a validated batch as a report in `preview` status.
    pub fn preview(
        resource: ResourceKind,
        mode: ImportMode,
        client_id: DbId,
        source_reference: Option<String>,
        preview: &ImportPreview,
        created_by: Option<DbId>,
    ) -> Self {
        Self {
            status: IMPORT_STATUS_PREVIEW.to_string(),
            resource: resource.as_str().to_string(),
            mode: mode.as_str().to_string(),
            source_reference,
            client_id,
            total_records: preview.total_records as i32,
            accepted: preview.accepted() as i32,
            rejected: preview.invalid.len() as i32,
            auto_corrected: preview.auto_corrected as i32,
            skipped: preview.to_skip.len() as i32,
            created_by,
        }
    }
}

impl TryFrom<&ImportPreviewEntry> for CreateImportReportEntry {
    type Error = serde_json::Error;

    fn try_from(entry: &ImportPreviewEntry) -> Result<Self, Self::Error> {
        Ok(Self {
            record_index: entry.record_index as i32,
            record_key: entry.key.clone(),
            entity_id: entry.entity_id,
            action: entry.action.as_str().to_string(),
            field_errors: serde_json::to_value(&entry.validation_result.errors)?,
            field_warnings: serde_json::to_value(&entry.validation_result.warnings)?,
            field_diffs: serde_json::to_value(&entry.field_diffs)?,
            payload: entry.payload.clone().map(serde_json::Value::Object),
        })
    }
}
