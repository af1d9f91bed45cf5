//! Row orchestration: runs every stage and decides each row's action.

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::clean::clean_row;
use super::columns::{columns_for, key_column, ColumnKind, ColumnSpec};
use super::defaults::apply_defaults;
use super::fields::{
    cross_field_checks, update_cross_field_checks, validate_fields, FieldValue, TypedRow,
};
use super::resolve::{Lookup, NaturalKey, ReferenceResolver};
use super::resource::{ImportMode, ImportSettings, ResourceKind};
use super::RawRow;
use crate::error::CoreError;
use crate::types::DbId;
use crate::validation::conflict::{detect_changes, IGNORED_FIELDS};
use crate::validation::import_preview::{ImportAction, ImportPreview, ImportPreviewEntry};
use crate::validation::rules::{
    FieldViolation, ValidationResult, RULE_ALREADY_EXISTS, RULE_DUPLICATE_IN_FILE,
    RULE_NOT_FOUND, RULE_TENANT_MISMATCH,
};

/// One import run for a resource, on behalf of a tenant.
#[derive(Debug, Clone)]
pub struct ImportPipeline {
    pub resource: ResourceKind,
    pub mode: ImportMode,
    /// Client of the importing user. Rows naming any other client are
    /// rejected.
    pub tenant_client_id: DbId,
    pub settings: ImportSettings,
}

/// In-file identity of a row: client code, site code, lowercased key.
type FileKey = (String, Option<String>, String);

/// Ids resolved for one row.
#[derive(Debug, Default)]
struct Resolved {
    client_id: Option<DbId>,
    bu_id: Option<DbId>,
    payload: Map<String, Value>,
}

impl ImportPipeline {
    pub fn new(
        resource: ResourceKind,
        mode: ImportMode,
        tenant_client_id: DbId,
        settings: ImportSettings,
    ) -> Self {
        Self {
            resource,
            mode,
            tenant_client_id,
            settings,
        }
    }

    /// Validate every row and build the preview. Nothing is written.
    ///
    /// Row-level problems end up in the preview; only an unusable batch or a
    /// resolver failure is returned as an error.
    pub async fn run<R>(&self, resolver: &mut R, rows: &[RawRow]) -> Result<ImportPreview, CoreError>
    where
        R: ReferenceResolver + ?Sized,
    {
        if rows.is_empty() {
            return Err(CoreError::Validation(
                "Import must contain at least one row".to_string(),
            ));
        }
        if rows.len() > self.settings.max_rows {
            return Err(CoreError::Validation(format!(
                "Import has {} rows, the limit is {}",
                rows.len(),
                self.settings.max_rows
            )));
        }

        let mut preview = ImportPreview::new(rows.len());
        let mut seen: HashSet<FileKey> = HashSet::new();

        for (index, raw) in rows.iter().enumerate() {
            let entry = self.process_row(resolver, index, raw, &mut seen).await?;
            preview.push(entry);
        }

        Ok(preview)
    }

    async fn process_row<R>(
        &self,
        resolver: &mut R,
        index: usize,
        raw: &RawRow,
        seen: &mut HashSet<FileKey>,
    ) -> Result<ImportPreviewEntry, CoreError>
    where
        R: ReferenceResolver + ?Sized,
    {
        let mut result = ValidationResult::new();

        let cleaned = clean_row(self.resource, raw, &mut result);
        let mut row = validate_fields(self.resource, self.mode, &cleaned, &self.settings, &mut result);
        apply_defaults(self.resource, self.mode, &mut row);
        cross_field_checks(self.resource, &row, &mut result);

        let key_spec = key_column(self.resource);
        let key = row.text(key_spec.name).map(str::to_string);

        if let Some(file_key) = self.file_key(&row, key.as_deref()) {
            if !seen.insert(file_key) {
                result.error(FieldViolation::new(
                    key_spec.name,
                    RULE_DUPLICATE_IN_FILE,
                    format!(
                        "{} appears more than once in this file; only the first row is used",
                        key_spec.name
                    ),
                ));
            }
        }

        let resolved = self.resolve_row(resolver, &row, &mut result).await?;

        let mut entry = ImportPreviewEntry {
            record_index: index,
            action: ImportAction::Reject,
            key: key.clone(),
            entity_id: None,
            validation_result: result,
            field_diffs: Vec::new(),
            payload: None,
        };

        let (Some(key), Some(client_id)) = (key, resolved.client_id) else {
            return Ok(entry);
        };
        if !entry.validation_result.is_valid {
            return Ok(entry);
        }

        let natural_key = NaturalKey {
            client_id,
            bu_id: if self.resource.requires_site() {
                resolved.bu_id
            } else {
                None
            },
            key,
        };
        let existing = resolver.find_existing(self.resource, &natural_key).await?;

        match (self.mode, existing) {
            (ImportMode::Create, Some(record)) => {
                entry.entity_id = Some(record.id);
                entry.validation_result.error(
                    FieldViolation::new(
                        key_spec.name,
                        RULE_ALREADY_EXISTS,
                        format!("A {} with this {} already exists", self.resource, key_spec.name),
                    )
                    .with_value(natural_key.key),
                );
            }
            (ImportMode::Create, None) => {
                entry.action = ImportAction::Create;
                entry.payload = Some(resolved.payload);
            }
            (ImportMode::Update, None) => {
                entry.validation_result.error(
                    FieldViolation::new(
                        key_spec.name,
                        RULE_NOT_FOUND,
                        format!("No {} with this {} exists to update", self.resource, key_spec.name),
                    )
                    .with_value(natural_key.key),
                );
            }
            (ImportMode::Update, Some(record)) => {
                entry.entity_id = Some(record.id);
                update_cross_field_checks(
                    self.resource,
                    &record.fields,
                    &resolved.payload,
                    &mut entry.validation_result,
                );
                if !entry.validation_result.is_valid {
                    return Ok(entry);
                }
                let diffs = detect_changes(
                    &record.fields,
                    &resolved.payload,
                    &diff_ignored_fields(self.resource),
                );
                if diffs.is_empty() {
                    entry.action = ImportAction::Skip;
                } else {
                    entry.action = ImportAction::Update;
                    entry.field_diffs = diffs;
                    entry.payload = Some(resolved.payload);
                }
            }
        }

        Ok(entry)
    }

    /// In-file identity, once the client, site (where required) and key are
    /// all readable.
    fn file_key(&self, row: &TypedRow, key: Option<&str>) -> Option<FileKey> {
        let client = row.text("client_code")?.to_string();
        let site = if self.resource.requires_site() {
            Some(row.text("site_code")?.to_string())
        } else {
            None
        };
        Some((client, site, key?.to_lowercase()))
    }

    /// Resolve codes to ids in dependency order and build the payload.
    ///
    /// Resolution stops at the client when it is unknown or belongs to
    /// another tenant, so no lookup ever runs under a foreign client.
    async fn resolve_row<R>(
        &self,
        resolver: &mut R,
        row: &TypedRow,
        result: &mut ValidationResult,
    ) -> Result<Resolved, CoreError>
    where
        R: ReferenceResolver + ?Sized,
    {
        let mut resolved = Resolved::default();

        let Some(client_code) = row.text("client_code") else {
            return Ok(resolved);
        };
        let lookup = Lookup::Client {
            code: client_code.to_string(),
        };
        let Some(client_id) = resolve_one(resolver, "client_code", &lookup, result).await? else {
            return Ok(resolved);
        };
        if client_id != self.tenant_client_id {
            result.error(
                FieldViolation::new(
                    "client_code",
                    RULE_TENANT_MISMATCH,
                    "client_code does not belong to your organisation",
                )
                .with_value(client_code),
            );
            return Ok(resolved);
        }
        resolved.client_id = Some(client_id);

        if let Some(site_code) = row.text("site_code") {
            let lookup = Lookup::Site {
                client_id,
                code: site_code.to_string(),
            };
            resolved.bu_id = resolve_one(resolver, "site_code", &lookup, result).await?;
        }

        for column in columns_for(self.resource) {
            let Some(target) = column.target else {
                continue;
            };
            let Some(value) = row.get(column.name) else {
                continue;
            };
            match column.kind {
                ColumnKind::Client => {
                    resolved.payload.insert(target.to_string(), client_id.into());
                }
                ColumnKind::Site => {
                    if let Some(bu_id) = resolved.bu_id {
                        resolved.payload.insert(target.to_string(), bu_id.into());
                    }
                }
                ColumnKind::TypeAssist { tatype } => {
                    let lookup = Lookup::TypeAssist {
                        client_id,
                        tatype,
                        code: code_of(value),
                    };
                    self.insert_resolved(resolver, column, target, &lookup, &mut resolved, result)
                        .await?;
                }
                ColumnKind::Reference { target: ref_target } => {
                    let Some(lookup) =
                        Lookup::reference(ref_target, client_id, resolved.bu_id, code_of(value))
                    else {
                        continue;
                    };
                    self.insert_resolved(resolver, column, target, &lookup, &mut resolved, result)
                        .await?;
                }
                ColumnKind::Gps => {
                    if let FieldValue::Gps { lat, lng } = value {
                        resolved.payload.insert("gps_lat".to_string(), (*lat).into());
                        resolved.payload.insert("gps_lng".to_string(), (*lng).into());
                    }
                }
                _ => {
                    resolved.payload.insert(target.to_string(), value.to_json());
                }
            }
        }

        for (name, value) in &row.derived {
            resolved.payload.insert((*name).to_string(), value.to_json());
        }

        Ok(resolved)
    }

    async fn insert_resolved<R>(
        &self,
        resolver: &mut R,
        column: &ColumnSpec,
        target: &str,
        lookup: &Lookup,
        resolved: &mut Resolved,
        result: &mut ValidationResult,
    ) -> Result<(), CoreError>
    where
        R: ReferenceResolver + ?Sized,
    {
        if let Some(id) = resolve_one(resolver, column.name, lookup, result).await? {
            resolved.payload.insert(target.to_string(), id.into());
        }
        Ok(())
    }
}

/// Payload keys left out of an update diff.
///
/// Site-scoped records are found through their site, so `bu_id` cannot
/// change; a vendor's site can. Job names match case-insensitively and an
/// update never rewrites them.
fn diff_ignored_fields(resource: ResourceKind) -> Vec<&'static str> {
    let mut fields = IGNORED_FIELDS.to_vec();
    if resource.requires_site() {
        fields.push("bu_id");
    }
    if resource.keyed_by_name() {
        fields.push("name");
    }
    fields
}

fn code_of(value: &FieldValue) -> String {
    value.as_text().unwrap_or_default().to_string()
}

/// Run one lookup, recording a `not_found` error on a miss.
async fn resolve_one<R>(
    resolver: &mut R,
    column: &str,
    lookup: &Lookup,
    result: &mut ValidationResult,
) -> Result<Option<DbId>, CoreError>
where
    R: ReferenceResolver + ?Sized,
{
    let id = resolver.lookup(lookup).await?;
    if id.is_none() {
        result.error(
            FieldViolation::new(
                column,
                RULE_NOT_FOUND,
                format!("No {} with code '{}'", lookup.entity(), lookup.code()),
            )
            .with_value(lookup.code()),
        );
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::import::resolve::ExistingRecord;
    use crate::validation::rules::{RULE_CROSS_FIELD, RULE_REQUIRED};

    const ACME: DbId = 1;
    const GLOBEX: DbId = 2;
    const HQ: DbId = 10;

    #[derive(Default)]
    struct MemoryResolver {
        ids: HashMap<Lookup, DbId>,
        existing: HashMap<(ResourceKind, NaturalKey), ExistingRecord>,
        lookups: usize,
    }

    #[async_trait]
    impl ReferenceResolver for MemoryResolver {
        async fn lookup(&mut self, lookup: &Lookup) -> Result<Option<DbId>, CoreError> {
            self.lookups += 1;
            Ok(self.ids.get(lookup).copied())
        }

        async fn find_existing(
            &mut self,
            resource: ResourceKind,
            key: &NaturalKey,
        ) -> Result<Option<ExistingRecord>, CoreError> {
            Ok(self.existing.get(&(resource, key.clone())).cloned())
        }
    }

    fn resolver() -> MemoryResolver {
        let mut r = MemoryResolver::default();
        r.ids.insert(Lookup::Client { code: "ACME".into() }, ACME);
        r.ids.insert(Lookup::Client { code: "GLOBEX".into() }, GLOBEX);
        r.ids.insert(
            Lookup::Site {
                client_id: ACME,
                code: "HQ".into(),
            },
            HQ,
        );
        r.ids.insert(
            Lookup::TypeAssist {
                client_id: ACME,
                tatype: "LOCATIONTYPE",
                code: "FLOOR".into(),
            },
            100,
        );
        r.ids.insert(
            Lookup::TypeAssist {
                client_id: ACME,
                tatype: "VENDORTYPE",
                code: "PLUMBING".into(),
            },
            101,
        );
        r.ids.insert(
            Lookup::People {
                client_id: ACME,
                code: "EMP1".into(),
            },
            200,
        );
        r.ids.insert(
            Lookup::Asset {
                client_id: ACME,
                bu_id: HQ,
                code: "PUMP-01".into(),
            },
            300,
        );
        r
    }

    fn row(value: Value) -> RawRow {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    fn location(code: &str) -> RawRow {
        row(json!({
            "Client Code*": "acme",
            "Site Code*": "hq",
            "Location Code*": code,
            "Location Name*": "Ground floor",
            "Location Type*": "floor",
        }))
    }

    fn pipeline(resource: ResourceKind, mode: ImportMode) -> ImportPipeline {
        ImportPipeline::new(resource, mode, ACME, ImportSettings::default())
    }

    #[tokio::test]
    async fn valid_rows_become_creates_with_resolved_payload() {
        let mut r = resolver();
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[location("gf")])
            .await
            .unwrap();

        assert_eq!(preview.to_create.len(), 1);
        let payload = preview.to_create[0].payload.as_ref().unwrap();
        assert_eq!(payload["client_id"], json!(ACME));
        assert_eq!(payload["bu_id"], json!(HQ));
        assert_eq!(payload["code"], json!("GF"));
        assert_eq!(payload["type_id"], json!(100));
        assert_eq!(payload["status"], json!("WORKING"));
        assert_eq!(payload["enable"], json!(true));
        assert_eq!(preview.to_create[0].key.as_deref(), Some("GF"));
    }

    #[tokio::test]
    async fn empty_batch_is_refused() {
        let mut r = resolver();
        let err = pipeline(ResourceKind::Asset, ImportMode::Create)
            .run(&mut r, &[])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn oversized_batch_is_refused() {
        let mut r = resolver();
        let mut p = pipeline(ResourceKind::Location, ImportMode::Create);
        p.settings.max_rows = 1;
        let err = p
            .run(&mut r, &[location("A"), location("B")])
            .await
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
    }

    #[tokio::test]
    async fn later_duplicates_in_file_are_rejected() {
        let mut r = resolver();
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[location("GF"), location("gf"), location("F1")])
            .await
            .unwrap();

        assert_eq!(preview.to_create.len(), 2);
        assert_eq!(preview.invalid.len(), 1);
        let dup = &preview.invalid[0];
        assert_eq!(dup.record_index, 1);
        assert_eq!(dup.validation_result.errors[0].rule_type, RULE_DUPLICATE_IN_FILE);
    }

    #[tokio::test]
    async fn foreign_client_is_a_tenant_mismatch() {
        let mut r = resolver();
        let mut raw = location("GF");
        raw.insert("Client Code*".into(), json!("globex"));
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        let entry = &preview.invalid[0];
        assert_eq!(entry.validation_result.errors.len(), 1);
        assert_eq!(entry.validation_result.errors[0].rule_type, RULE_TENANT_MISMATCH);
        // Only the client lookup ran.
        assert_eq!(r.lookups, 1);
    }

    #[tokio::test]
    async fn unknown_codes_are_not_found() {
        let mut r = resolver();
        let mut raw = location("GF");
        raw.insert("Location Type*".into(), json!("roof"));
        raw.insert("parent_location_code".into(), json!("ZZ"));
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        let errors = &preview.invalid[0].validation_result.errors;
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["location_type", "parent_location_code"]);
        assert!(errors.iter().all(|e| e.rule_type == RULE_NOT_FOUND));
    }

    #[tokio::test]
    async fn create_rejects_existing_key() {
        let mut r = resolver();
        r.existing.insert(
            (
                ResourceKind::Location,
                NaturalKey {
                    client_id: ACME,
                    bu_id: Some(HQ),
                    key: "GF".into(),
                },
            ),
            ExistingRecord {
                id: 55,
                fields: Map::new(),
            },
        );
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[location("GF")])
            .await
            .unwrap();

        let entry = &preview.invalid[0];
        assert_eq!(entry.entity_id, Some(55));
        assert_eq!(entry.validation_result.errors[0].rule_type, RULE_ALREADY_EXISTS);
    }

    #[tokio::test]
    async fn update_rejects_missing_key() {
        let mut r = resolver();
        let preview = pipeline(ResourceKind::Location, ImportMode::Update)
            .run(&mut r, &[location("GF")])
            .await
            .unwrap();
        assert_eq!(
            preview.invalid[0].validation_result.errors[0].rule_type,
            RULE_NOT_FOUND
        );
    }

    #[tokio::test]
    async fn update_diffs_or_skips() {
        let mut r = resolver();
        let stored = json!({
            "id": 55,
            "client_id": ACME,
            "bu_id": HQ,
            "code": "GF",
            "name": "Ground floor",
            "type_id": 100,
        });
        r.existing.insert(
            (
                ResourceKind::Location,
                NaturalKey {
                    client_id: ACME,
                    bu_id: Some(HQ),
                    key: "GF".into(),
                },
            ),
            ExistingRecord {
                id: 55,
                fields: row(stored),
            },
        );

        let mut renamed = location("GF");
        renamed.insert("Location Name*".into(), json!("Lobby"));
        let preview = pipeline(ResourceKind::Location, ImportMode::Update)
            .run(&mut r, &[location("GF"), renamed])
            .await
            .unwrap();

        // The second row repeats the key, so only the first is considered.
        assert_eq!(preview.to_skip.len(), 1);
        assert_eq!(preview.to_skip[0].entity_id, Some(55));
        assert_eq!(preview.invalid.len(), 1);

        let mut renamed = location("GF");
        renamed.insert("Location Name*".into(), json!("Lobby"));
        let preview = pipeline(ResourceKind::Location, ImportMode::Update)
            .run(&mut r, &[renamed])
            .await
            .unwrap();
        let entry = &preview.to_update[0];
        assert_eq!(entry.field_diffs.len(), 1);
        assert_eq!(entry.field_diffs[0].field, "name");
        assert_eq!(entry.field_diffs[0].incoming_value, json!("Lobby"));
    }

    #[tokio::test]
    async fn update_without_required_create_columns_is_valid() {
        let mut r = resolver();
        r.existing.insert(
            (
                ResourceKind::Location,
                NaturalKey {
                    client_id: ACME,
                    bu_id: Some(HQ),
                    key: "GF".into(),
                },
            ),
            ExistingRecord {
                id: 55,
                fields: Map::new(),
            },
        );
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "location_code": "GF",
            "enable": "no",
        }));
        let preview = pipeline(ResourceKind::Location, ImportMode::Update)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        let payload = preview.to_update[0].payload.as_ref().unwrap();
        assert_eq!(payload["enable"], json!(false));
        assert!(!payload.contains_key("status"));
    }

    fn stored_task(r: &mut MemoryResolver, key: &str) {
        let stored = json!({
            "id": 70,
            "client_id": ACME,
            "bu_id": HQ,
            "name": "Daily check",
            "identifier": "TASK",
            "from_date": "2026-06-01T00:00:00Z",
            "upto_date": "2026-12-31T00:00:00Z",
            "plan_duration": 10,
            "grace_time": 0,
        });
        r.existing.insert(
            (
                ResourceKind::Task,
                NaturalKey {
                    client_id: ACME,
                    bu_id: Some(HQ),
                    key: key.into(),
                },
            ),
            ExistingRecord {
                id: 70,
                fields: row(stored),
            },
        );
    }

    #[tokio::test]
    async fn one_sided_job_update_is_checked_against_stored_values() {
        let mut r = resolver();
        stored_task(&mut r, "Daily check");
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "task_name": "Daily check",
            "upto_date": "2026-01-01",
            "grace_time": 60,
        }));
        let preview = pipeline(ResourceKind::Task, ImportMode::Update)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        assert!(preview.to_update.is_empty());
        let entry = &preview.invalid[0];
        assert_eq!(entry.entity_id, Some(70));
        let fields: Vec<(&str, &str)> = entry
            .validation_result
            .errors
            .iter()
            .map(|e| (e.field.as_str(), e.rule_type.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![("upto_date", RULE_CROSS_FIELD), ("grace_time", RULE_CROSS_FIELD)]
        );
    }

    #[tokio::test]
    async fn one_sided_job_update_within_stored_range_is_accepted() {
        let mut r = resolver();
        stored_task(&mut r, "Daily check");
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "task_name": "Daily check",
            "upto_date": "2027-01-01",
            "grace_time": 5,
        }));
        let preview = pipeline(ResourceKind::Task, ImportMode::Update)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        let diffs: Vec<&str> = preview.to_update[0]
            .field_diffs
            .iter()
            .map(|d| d.field.as_str())
            .collect();
        assert_eq!(diffs, vec!["grace_time", "upto_date"]);
    }

    #[tokio::test]
    async fn job_name_case_is_not_a_change() {
        let mut r = resolver();
        // Stored names match case-insensitively.
        stored_task(&mut r, "DAILY CHECK");
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "task_name": "DAILY CHECK",
        }));
        let preview = pipeline(ResourceKind::Task, ImportMode::Update)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        assert!(preview.to_update.is_empty());
        assert_eq!(preview.to_skip[0].entity_id, Some(70));
    }

    #[tokio::test]
    async fn vendor_update_can_move_onto_a_site() {
        let mut r = resolver();
        r.existing.insert(
            (
                ResourceKind::Vendor,
                NaturalKey {
                    client_id: ACME,
                    bu_id: None,
                    key: "V-1".into(),
                },
            ),
            ExistingRecord {
                id: 80,
                fields: row(json!({
                    "id": 80,
                    "client_id": ACME,
                    "bu_id": null,
                    "code": "V-1",
                    "name": "Flow Plumbing",
                })),
            },
        );
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "vendor_code": "v-1",
        }));
        let preview = pipeline(ResourceKind::Vendor, ImportMode::Update)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        let entry = &preview.to_update[0];
        assert_eq!(entry.field_diffs.len(), 1);
        assert_eq!(entry.field_diffs[0].field, "bu_id");
        assert_eq!(entry.field_diffs[0].incoming_value, json!(HQ));
    }

    #[tokio::test]
    async fn task_payload_carries_identifier_and_references() {
        let mut r = resolver();
        let raw = row(json!({
            "client_code": "ACME",
            "site_code": "HQ",
            "task_name": "Daily pump check",
            "cron": "0 9 * * *",
            "from_date": "2026-01-01",
            "upto_date": "2026-12-31",
            "plan_duration": 30,
            "asset_code": "pump-01",
            "people_code": "emp1",
        }));
        let preview = pipeline(ResourceKind::Task, ImportMode::Create)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        assert!(preview.invalid.is_empty(), "{:?}", preview.invalid);
        let payload = preview.to_create[0].payload.as_ref().unwrap();
        assert_eq!(payload["identifier"], json!("TASK"));
        assert_eq!(payload["asset_id"], json!(300));
        assert_eq!(payload["people_id"], json!(200));
        assert_eq!(payload["scan_type"], json!("SKIP"));
        assert_eq!(payload["from_date"], json!("2026-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn vendor_without_site_is_client_wide() {
        let mut r = resolver();
        let raw = row(json!({
            "client_code": "ACME",
            "vendor_code": "V-1",
            "vendor_name": "Flow Plumbing",
            "vendor_type": "plumbing",
            "mobile": "98450 12345",
            "gps": "12.97,77.59",
        }));
        let preview = pipeline(ResourceKind::Vendor, ImportMode::Create)
            .run(&mut r, &[raw])
            .await
            .unwrap();

        assert_eq!(preview.auto_corrected, 1);
        let payload = preview.to_create[0].payload.as_ref().unwrap();
        assert!(!payload.contains_key("bu_id"));
        assert_eq!(payload["show_to_all_sites"], json!(true));
        assert_eq!(payload["mobile_no"], json!("+919845012345"));
        assert_eq!(payload["gps_lat"], json!(12.97));
        assert_eq!(payload["gps_lng"], json!(77.59));
    }

    #[tokio::test]
    async fn invalid_rows_keep_every_error() {
        let mut r = resolver();
        let raw = row(json!({ "client_code": "ACME", "site_code": "HQ" }));
        let preview = pipeline(ResourceKind::Location, ImportMode::Create)
            .run(&mut r, &[raw])
            .await
            .unwrap();
        let entry = &preview.invalid[0];
        assert!(entry.key.is_none());
        assert!(entry.payload.is_none());
        assert_eq!(
            entry
                .validation_result
                .errors
                .iter()
                .filter(|e| e.rule_type == RULE_REQUIRED)
                .count(),
            3
        );
    }
}
