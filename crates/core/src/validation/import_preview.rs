//! Import preview types for dry-run analysis.

use serde::{Deserialize, Serialize};

use super::conflict::FieldDiff;
use super::rules::ValidationResult;
use crate::types::DbId;

/// Action to be taken for an import record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ImportAction {
    Create,
    Update,
    Skip,
    Reject,
}

impl ImportAction {
    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Skip => "skip",
            Self::Reject => "reject",
        }
    }

    /// Parse the stored string form back into an action.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "create" => Some(Self::Create),
            "update" => Some(Self::Update),
            "skip" => Some(Self::Skip),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

/// Preview entry for a single row of the import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreviewEntry {
    /// Zero-based position of the row in the submitted batch.
    pub record_index: usize,
    pub action: ImportAction,
    /// Natural key of the row (code or name), when it could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<DbId>,
    pub validation_result: ValidationResult,
    pub field_diffs: Vec<FieldDiff>,
    /// Resolved database payload, present for create and update actions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Map<String, serde_json::Value>>,
}

/// Aggregated import preview showing what would happen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportPreview {
    pub total_records: usize,
    pub auto_corrected: usize,
    pub to_create: Vec<ImportPreviewEntry>,
    pub to_update: Vec<ImportPreviewEntry>,
    pub to_skip: Vec<ImportPreviewEntry>,
    pub invalid: Vec<ImportPreviewEntry>,
}

impl ImportPreview {
    /// Create an empty preview for a given record count.
    pub fn new(total_records: usize) -> Self {
        Self {
            total_records,
            auto_corrected: 0,
            to_create: Vec::new(),
            to_update: Vec::new(),
            to_skip: Vec::new(),
            invalid: Vec::new(),
        }
    }

    /// Add a preview entry to the appropriate bucket.
    pub fn push(&mut self, entry: ImportPreviewEntry) {
        if entry.action != ImportAction::Reject && entry.validation_result.was_auto_corrected() {
            self.auto_corrected += 1;
        }
        match entry.action {
            ImportAction::Create => self.to_create.push(entry),
            ImportAction::Update => self.to_update.push(entry),
            ImportAction::Skip => self.to_skip.push(entry),
            ImportAction::Reject => self.invalid.push(entry),
        }
    }

    /// Number of rows a commit would write.
    pub fn accepted(&self) -> usize {
        self.to_create.len() + self.to_update.len()
    }

    /// All entries ordered by their position in the batch.
    pub fn entries(&self) -> Vec<&ImportPreviewEntry> {
        let mut all: Vec<&ImportPreviewEntry> = self
            .to_create
            .iter()
            .chain(self.to_update.iter())
            .chain(self.to_skip.iter())
            .chain(self.invalid.iter())
            .collect();
        all.sort_by_key(|e| e.record_index);
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::rules::{FieldViolation, RULE_AUTO_CORRECTED};

    fn entry(index: usize, action: ImportAction) -> ImportPreviewEntry {
        ImportPreviewEntry {
            record_index: index,
            action,
            key: None,
            entity_id: None,
            validation_result: ValidationResult::new(),
            field_diffs: Vec::new(),
            payload: None,
        }
    }

    #[test]
    fn push_buckets_by_action() {
        let mut preview = ImportPreview::new(4);
        preview.push(entry(0, ImportAction::Create));
        preview.push(entry(1, ImportAction::Update));
        preview.push(entry(2, ImportAction::Skip));
        preview.push(entry(3, ImportAction::Reject));
        assert_eq!(preview.to_create.len(), 1);
        assert_eq!(preview.to_update.len(), 1);
        assert_eq!(preview.to_skip.len(), 1);
        assert_eq!(preview.invalid.len(), 1);
        assert_eq!(preview.accepted(), 2);
    }

    #[test]
    fn entries_are_ordered_by_index() {
        let mut preview = ImportPreview::new(3);
        preview.push(entry(2, ImportAction::Reject));
        preview.push(entry(0, ImportAction::Create));
        preview.push(entry(1, ImportAction::Skip));
        let order: Vec<usize> = preview.entries().iter().map(|e| e.record_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn counts_auto_corrected_accepted_rows_only() {
        let mut preview = ImportPreview::new(2);
        let mut corrected = entry(0, ImportAction::Create);
        corrected
            .validation_result
            .warning(FieldViolation::new("enable", RULE_AUTO_CORRECTED, "defaulted"));
        let mut rejected = corrected.clone();
        rejected.record_index = 1;
        rejected.action = ImportAction::Reject;
        preview.push(corrected);
        preview.push(rejected);
        assert_eq!(preview.auto_corrected, 1);
    }

    #[test]
    fn action_round_trips_through_str() {
        for action in [
            ImportAction::Create,
            ImportAction::Update,
            ImportAction::Skip,
            ImportAction::Reject,
        ] {
            assert_eq!(ImportAction::parse(action.as_str()), Some(action));
        }
        assert_eq!(ImportAction::parse("bogus"), None);
    }
}
