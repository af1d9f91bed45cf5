//! Validation result types and violation codes.

use serde::{Deserialize, Serialize};

// ── Violation codes ──────────────────────────────────────────────────

pub const RULE_REQUIRED: &str = "required";
pub const RULE_INVALID_FORMAT: &str = "invalid_format";
pub const RULE_MAX_LENGTH: &str = "max_length";
pub const RULE_MIN_VALUE: &str = "min_value";
pub const RULE_ENUM_VALUES: &str = "enum_values";
pub const RULE_UNSUPPORTED_VALUE: &str = "unsupported_value";
pub const RULE_UNKNOWN_COLUMN: &str = "unknown_column";
pub const RULE_CROSS_FIELD: &str = "cross_field";
pub const RULE_NOT_FOUND: &str = "not_found";
pub const RULE_TENANT_MISMATCH: &str = "tenant_mismatch";
pub const RULE_ALREADY_EXISTS: &str = "already_exists";
pub const RULE_DUPLICATE_IN_FILE: &str = "duplicate_in_file";
pub const RULE_AUTO_CORRECTED: &str = "auto_corrected";

/// Whether a violation blocks the row or is informational.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
}

/// Aggregated result of validating one import row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<FieldViolation>,
    pub warnings: Vec<FieldViolation>,
}

impl ValidationResult {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record a violation. Errors flip `is_valid`.
    pub fn push(&mut self, severity: ValidationSeverity, violation: FieldViolation) {
        match severity {
            ValidationSeverity::Error => {
                self.is_valid = false;
                self.errors.push(violation);
            }
            ValidationSeverity::Warning => self.warnings.push(violation),
        }
    }

    pub fn error(&mut self, violation: FieldViolation) {
        self.push(ValidationSeverity::Error, violation);
    }

    pub fn warning(&mut self, violation: FieldViolation) {
        self.push(ValidationSeverity::Warning, violation);
    }

    /// True when any warning records an automatic correction.
    pub fn was_auto_corrected(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.rule_type == RULE_AUTO_CORRECTED)
    }
}

/// A single field-level rule violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldViolation {
    pub field: String,
    pub rule_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

impl FieldViolation {
    pub fn new(field: &str, rule_type: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            rule_type: rule_type.to_string(),
            message: message.into(),
            value: None,
        }
    }

    /// Attach the offending cell value.
    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }
}
