//! Repository for import reports and report entries.

use facility_core::import_status::{IMPORT_STATUS_CANCELLED, IMPORT_STATUS_PREVIEW};
use facility_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::import_report::{
    CreateImportReport, CreateImportReportEntry, ImportReport, ImportReportEntry,
};

/// Column list for `import_reports` queries, aliased `r` and joined with
/// the status table as `s`.
const REPORT_COLUMNS: &str =
    "r.id, r.status_id, s.name AS status, r.resource, r.mode, r.source_reference, r.client_id, \
     r.total_records, r.accepted, r.rejected, r.auto_corrected, r.skipped, r.created_by, \
     r.committed_by, r.committed_at, r.created_at, r.updated_at";

/// Column list for `import_report_entries` queries.
const ENTRY_COLUMNS: &str =
    "id, report_id, record_index, record_key, entity_id, action, field_errors, field_warnings, \
     field_diffs, payload, created_at, updated_at";

/// Provides persistence for import reports and their entries.
pub struct ImportReportRepo;

impl ImportReportRepo {
    /// Create a report together with all of its entries in one transaction.
    /// The `status` field is resolved by name from `import_report_statuses`.
    pub async fn create_with_entries(
        pool: &PgPool,
        input: &CreateImportReport,
        entries: &[CreateImportReportEntry],
    ) -> Result<ImportReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO import_reports \
                (status_id, resource, mode, source_reference, client_id, total_records, \
                 accepted, rejected, auto_corrected, skipped, created_by) \
             VALUES ( \
                (SELECT id FROM import_report_statuses WHERE name = $1), \
                $2, $3, $4, $5, $6, $7, $8, $9, $10, $11 \
             ) \
             RETURNING id",
        )
        .bind(&input.status)
        .bind(&input.resource)
        .bind(&input.mode)
        .bind(&input.source_reference)
        .bind(input.client_id)
        .bind(input.total_records)
        .bind(input.accepted)
        .bind(input.rejected)
        .bind(input.auto_corrected)
        .bind(input.skipped)
        .bind(input.created_by)
        .fetch_one(&mut *tx)
        .await?;

        for entry in entries {
            Self::insert_entry(&mut tx, id, entry).await?;
        }

        let report = Self::find_in_tx(&mut tx, id).await?;
        tx.commit().await?;
        Ok(report)
    }

    async fn insert_entry(
        tx: &mut Transaction<'_, Postgres>,
        report_id: DbId,
        input: &CreateImportReportEntry,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO import_report_entries \
                (report_id, record_index, record_key, entity_id, action, field_errors, \
                 field_warnings, field_diffs, payload) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(report_id)
        .bind(input.record_index)
        .bind(&input.record_key)
        .bind(input.entity_id)
        .bind(&input.action)
        .bind(&input.field_errors)
        .bind(&input.field_warnings)
        .bind(&input.field_diffs)
        .bind(&input.payload)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    async fn find_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<ImportReport, sqlx::Error> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM import_reports r \
             JOIN import_report_statuses s ON s.id = r.status_id \
             WHERE r.id = $1"
        );
        sqlx::query_as::<_, ImportReport>(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a report by ID within a client. Reports of other clients are
    /// invisible.
    pub async fn find_for_client(
        pool: &PgPool,
        id: DbId,
        client_id: DbId,
    ) -> Result<Option<ImportReport>, sqlx::Error> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM import_reports r \
             JOIN import_report_statuses s ON s.id = r.status_id \
             WHERE r.id = $1 AND r.client_id = $2"
        );
        sqlx::query_as::<_, ImportReport>(&sql)
            .bind(id)
            .bind(client_id)
            .fetch_optional(pool)
            .await
    }

    /// List a client's reports, newest first, optionally filtered by resource.
    pub async fn list(
        pool: &PgPool,
        client_id: DbId,
        resource: Option<&str>,
    ) -> Result<Vec<ImportReport>, sqlx::Error> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM import_reports r \
             JOIN import_report_statuses s ON s.id = r.status_id \
             WHERE r.client_id = $1 \
               AND ($2::TEXT IS NULL OR r.resource = $2) \
             ORDER BY r.created_at DESC, r.id DESC"
        );
        sqlx::query_as::<_, ImportReport>(&sql)
            .bind(client_id)
            .bind(resource)
            .fetch_all(pool)
            .await
    }

    /// Move a report to a new status inside an open transaction, but only
    /// from `expected_status`.
    ///
    /// Returns `false` when the report was not in `expected_status`, so two
    /// concurrent commits cannot both succeed.
    pub async fn transition_status(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        expected_status: &str,
        status: &str,
        committed_by: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE import_reports SET \
                status_id = (SELECT id FROM import_report_statuses WHERE name = $3), \
                committed_by = $4, \
                committed_at = NOW() \
             WHERE id = $1 \
               AND status_id = (SELECT id FROM import_report_statuses WHERE name = $2)",
        )
        .bind(id)
        .bind(expected_status)
        .bind(status)
        .bind(committed_by)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Discard a `preview` report of a client. Entries are kept for the
    /// record. Returns `false` when the report is missing or not in
    /// `preview`.
    pub async fn cancel(pool: &PgPool, id: DbId, client_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE import_reports SET \
                status_id = (SELECT id FROM import_report_statuses WHERE name = $4) \
             WHERE id = $1 AND client_id = $2 \
               AND status_id = (SELECT id FROM import_report_statuses WHERE name = $3)",
        )
        .bind(id)
        .bind(client_id)
        .bind(IMPORT_STATUS_PREVIEW)
        .bind(IMPORT_STATUS_CANCELLED)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Report Entries ───────────────────────────────────────────────

    /// List all entries for a report, ordered by `record_index`.
    pub async fn list_entries(
        pool: &PgPool,
        report_id: DbId,
    ) -> Result<Vec<ImportReportEntry>, sqlx::Error> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM import_report_entries \
             WHERE report_id = $1 ORDER BY record_index"
        );
        sqlx::query_as::<_, ImportReportEntry>(&sql)
            .bind(report_id)
            .fetch_all(pool)
            .await
    }

    /// Record the entity an entry was written to, inside an open transaction.
    pub async fn set_entry_entity(
        tx: &mut Transaction<'_, Postgres>,
        entry_id: DbId,
        entity_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE import_report_entries SET entity_id = $2 WHERE id = $1")
            .bind(entry_id)
            .bind(entity_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Export a full report as JSON (report metadata + all entries).
    ///
    /// Returns `None` if the report does not exist for this client.
    pub async fn export_json(
        pool: &PgPool,
        report_id: DbId,
        client_id: DbId,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let report = match Self::find_for_client(pool, report_id, client_id).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let entries = Self::list_entries(pool, report_id).await?;
        Ok(Some(serde_json::json!({
            "report": report,
            "entries": entries,
        })))
    }

    /// Export a report's entries as a CSV string.
    ///
    /// Returns `None` if the report does not exist for this client.
    pub async fn export_csv(
        pool: &PgPool,
        report_id: DbId,
        client_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        if Self::find_for_client(pool, report_id, client_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }
        let entries = Self::list_entries(pool, report_id).await?;

        let mut csv = String::from("record_index,record_key,entity_id,action,errors,warnings\n");
        for entry in &entries {
            let entity_id = entry.entity_id.map(|id| id.to_string()).unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                entry.record_index + 1,
                csv_field(entry.record_key.as_deref().unwrap_or_default()),
                entity_id,
                entry.action,
                csv_field(&violation_messages(&entry.field_errors)),
                csv_field(&violation_messages(&entry.field_warnings)),
            ));
        }
        Ok(Some(csv))
    }
}

/// Join the `field: message` pairs of a stored violation list.
fn violation_messages(violations: &serde_json::Value) -> String {
    violations
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|v| {
                    let field = v.get("field").and_then(|f| f.as_str()).unwrap_or_default();
                    let message = v.get("message").and_then(|m| m.as_str()).unwrap_or_default();
                    format!("{field}: {message}")
                })
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default()
}

/// Quote a CSV field when it contains a delimiter, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
