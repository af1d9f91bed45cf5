//! Typed parsing of cleaned cells and cross-field checks.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use super::clean::CleanRow;
use super::columns::{columns_for, ColumnKind, ColumnSpec, MAX_CODE_LEN};
use super::resource::{ImportMode, ImportSettings, ResourceKind};
use crate::scheduling;
use crate::types::Timestamp;
use crate::validation::rules::{
    FieldViolation, ValidationResult, RULE_AUTO_CORRECTED, RULE_CROSS_FIELD, RULE_ENUM_VALUES,
    RULE_INVALID_FORMAT, RULE_MAX_LENGTH, RULE_MIN_VALUE, RULE_REQUIRED,
};

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9_\-#/.]+$").expect("valid regex"));

/// Date formats accepted besides RFC 3339.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y"];

/// A parsed cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(Timestamp),
    Gps { lat: f64, lng: f64 },
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Int(n) => Value::from(*n),
            Self::Float(f) => Value::from(*f),
            Self::Bool(b) => Value::Bool(*b),
            Self::DateTime(ts) => Value::String(ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            Self::Gps { lat, lng } => Value::String(format!("{lat},{lng}")),
        }
    }
}

/// A row after typed parsing, keyed by canonical column name.
///
/// `derived` holds payload values that no single column maps to, such as a
/// job's identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedRow {
    pub values: BTreeMap<&'static str, FieldValue>,
    pub derived: BTreeMap<&'static str, FieldValue>,
}

impl TypedRow {
    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(FieldValue::as_text)
    }

    pub fn int(&self, column: &str) -> Option<i64> {
        match self.get(column) {
            Some(FieldValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn timestamp(&self, column: &str) -> Option<Timestamp> {
        match self.get(column) {
            Some(FieldValue::DateTime(ts)) => Some(*ts),
            _ => None,
        }
    }

    pub fn contains(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }
}

/// A successfully parsed cell, possibly rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCell {
    pub value: FieldValue,
    /// Describes an automatic rewrite the user should know about.
    pub correction: Option<String>,
}

impl ParsedCell {
    fn plain(value: FieldValue) -> Self {
        Self {
            value,
            correction: None,
        }
    }
}

fn invalid(column: &ColumnSpec, raw: &str, message: String) -> FieldViolation {
    FieldViolation::new(column.name, RULE_INVALID_FORMAT, message).with_value(raw)
}

/// Parse a code cell: uppercase, restricted alphabet, bounded length.
fn parse_code(column: &ColumnSpec, raw: &str) -> Result<String, FieldViolation> {
    let code = raw.to_uppercase();
    if code.chars().count() > MAX_CODE_LEN {
        return Err(FieldViolation::new(
            column.name,
            RULE_MAX_LENGTH,
            format!("{} must be at most {MAX_CODE_LEN} characters", column.name),
        )
        .with_value(raw));
    }
    if !CODE_RE.is_match(&code) {
        return Err(invalid(
            column,
            raw,
            format!(
                "{} may only contain letters, digits and _ - # / . (no spaces)",
                column.name
            ),
        ));
    }
    Ok(code)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "t" => Some(true),
        "false" | "no" | "n" | "0" | "f" => Some(false),
        _ => None,
    }
}

/// Integers may arrive as `5.0` from spreadsheet number cells.
fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Parse a timestamp, interpreting zone-less input as UTC.
pub fn parse_datetime(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

fn parse_gps(raw: &str) -> Option<(f64, f64)> {
    let (lat, lng) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    let in_range = (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng);
    in_range.then_some((lat, lng))
}

/// Normalise a phone number to `+<digits>`.
///
/// Bare ten-digit numbers get `default_country_code`; a leading `00` becomes
/// `+`; other bare numbers are assumed to already carry a country code.
pub fn normalize_phone(raw: &str, default_country_code: &str) -> Result<ParsedCell, String> {
    let compact: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '.'))
        .collect();

    let (has_plus, digits) = match compact.strip_prefix('+') {
        Some(rest) => (true, rest.to_string()),
        None => match compact.strip_prefix("00") {
            Some(rest) => (true, rest.to_string()),
            None => (false, compact.clone()),
        },
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err("mobile_no may only contain digits and an optional leading +".to_string());
    }
    if digits.len() < 10 || digits.len() > 15 {
        return Err(format!(
            "mobile_no must have 10 to 15 digits, got {}",
            digits.len()
        ));
    }

    let normalized = if has_plus {
        format!("+{digits}")
    } else if digits.len() == 10 {
        format!("{default_country_code}{digits}")
    } else {
        format!("+{digits}")
    };
    let correction = (normalized != raw).then(|| format!("mobile_no rewritten to {normalized}"));

    Ok(ParsedCell {
        value: FieldValue::Text(normalized),
        correction,
    })
}

/// Parse one non-empty cell according to its column.
pub fn parse_cell(
    column: &ColumnSpec,
    raw: &str,
    settings: &ImportSettings,
) -> Result<ParsedCell, FieldViolation> {
    let value = match column.kind {
        ColumnKind::Client
        | ColumnKind::Site
        | ColumnKind::Code
        | ColumnKind::TypeAssist { .. }
        | ColumnKind::Reference { .. } => FieldValue::Text(parse_code(column, raw)?),
        ColumnKind::Text { max_len } => {
            if raw.chars().count() > max_len {
                return Err(FieldViolation::new(
                    column.name,
                    RULE_MAX_LENGTH,
                    format!("{} must be at most {max_len} characters", column.name),
                )
                .with_value(raw));
            }
            FieldValue::Text(raw.to_string())
        }
        ColumnKind::Int { min } => {
            let n = parse_int(raw)
                .ok_or_else(|| invalid(column, raw, format!("{} must be a whole number", column.name)))?;
            if n < min {
                return Err(FieldViolation::new(
                    column.name,
                    RULE_MIN_VALUE,
                    format!("{} must be at least {min}", column.name),
                )
                .with_value(raw));
            }
            FieldValue::Int(n)
        }
        ColumnKind::Float { min } => {
            let f = raw
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| invalid(column, raw, format!("{} must be a number", column.name)))?;
            if f < min {
                return Err(FieldViolation::new(
                    column.name,
                    RULE_MIN_VALUE,
                    format!("{} must be at least {min}", column.name),
                )
                .with_value(raw));
            }
            FieldValue::Float(f)
        }
        ColumnKind::Bool => FieldValue::Bool(parse_bool(raw).ok_or_else(|| {
            invalid(
                column,
                raw,
                format!("{} must be yes/no or true/false", column.name),
            )
        })?),
        ColumnKind::DateTime => FieldValue::DateTime(parse_datetime(raw).ok_or_else(|| {
            invalid(
                column,
                raw,
                format!(
                    "{} must be a date like 2026-01-31 or 2026-01-31 09:30",
                    column.name
                ),
            )
        })?),
        ColumnKind::Choice { values } => {
            let upper = raw.to_uppercase();
            if !values.contains(&upper.as_str()) {
                return Err(FieldViolation::new(
                    column.name,
                    RULE_ENUM_VALUES,
                    format!("{} must be one of {}", column.name, values.join(", ")),
                )
                .with_value(raw));
            }
            FieldValue::Text(upper)
        }
        ColumnKind::Cron => {
            let normalized =
                scheduling::validate_cron(raw).map_err(|msg| invalid(column, raw, msg))?;
            FieldValue::Text(normalized)
        }
        ColumnKind::Gps => {
            let (lat, lng) = parse_gps(raw).ok_or_else(|| {
                invalid(
                    column,
                    raw,
                    format!(
                        "{} must be 'latitude,longitude' within valid ranges",
                        column.name
                    ),
                )
            })?;
            FieldValue::Gps { lat, lng }
        }
        ColumnKind::Email => {
            let email = raw.to_lowercase();
            if !email.validate_email() {
                return Err(invalid(
                    column,
                    raw,
                    format!("{} is not a valid email address", column.name),
                ));
            }
            FieldValue::Text(email)
        }
        ColumnKind::Phone => {
            return normalize_phone(raw, &settings.default_country_code)
                .map_err(|msg| invalid(column, raw, msg));
        }
    };
    Ok(ParsedCell::plain(value))
}

/// Whether a column must be present in the given mode.
///
/// Updates only need enough to find the record: the key, the client and,
/// where the resource has one, the site.
pub fn required_in(column: &ColumnSpec, mode: ImportMode) -> bool {
    match mode {
        ImportMode::Create => column.required,
        ImportMode::Update => {
            column.key
                || column.kind == ColumnKind::Client
                || (column.kind == ColumnKind::Site && column.required)
        }
    }
}

/// Parse every cell of a cleaned row and report required/format violations.
pub fn validate_fields(
    kind: ResourceKind,
    mode: ImportMode,
    row: &CleanRow,
    settings: &ImportSettings,
    result: &mut ValidationResult,
) -> TypedRow {
    let mut typed = TypedRow::default();

    for column in columns_for(kind) {
        match row.get(column.name) {
            None => {
                if required_in(column, mode) {
                    result.error(FieldViolation::new(
                        column.name,
                        RULE_REQUIRED,
                        format!("{} is required", column.name),
                    ));
                }
            }
            Some(raw) => match parse_cell(column, raw, settings) {
                Ok(parsed) => {
                    if let Some(message) = parsed.correction {
                        result.warning(
                            FieldViolation::new(column.name, RULE_AUTO_CORRECTED, message)
                                .with_value(raw),
                        );
                    }
                    typed.values.insert(column.name, parsed.value);
                }
                Err(violation) => result.error(violation),
            },
        }
    }

    typed
}

/// Checks spanning more than one column. Runs after defaults are injected.
pub fn cross_field_checks(kind: ResourceKind, row: &TypedRow, result: &mut ValidationResult) {
    match kind {
        ResourceKind::Task | ResourceKind::Tour => {
            if let (Some(from), Some(upto)) = (row.timestamp("from_date"), row.timestamp("upto_date"))
            {
                if upto <= from {
                    result.error(FieldViolation::new(
                        "upto_date",
                        RULE_CROSS_FIELD,
                        "upto_date must be later than from_date",
                    ));
                }
            }
            if let (Some(grace), Some(plan)) = (row.int("grace_time"), row.int("plan_duration")) {
                if grace > plan {
                    result.error(FieldViolation::new(
                        "grace_time",
                        RULE_CROSS_FIELD,
                        "grace_time cannot exceed plan_duration",
                    ));
                }
            }
        }
        ResourceKind::Asset => {
            self_parent_check(row, "asset_code", "parent_asset_code", result);
        }
        ResourceKind::Location => {
            self_parent_check(row, "location_code", "parent_location_code", result);
        }
        ResourceKind::Vendor => {}
    }
}

/// Checks spanning more than one column, run for an update on the incoming
/// payload laid over the stored record.
///
/// A row that moves only `upto_date` or only `grace_time` is checked against
/// the stored value of the other side. Row-only pairs were already checked by
/// [`cross_field_checks`].
pub fn update_cross_field_checks(
    kind: ResourceKind,
    stored: &Map<String, Value>,
    incoming: &Map<String, Value>,
    result: &mut ValidationResult,
) {
    if !matches!(kind, ResourceKind::Task | ResourceKind::Tour) {
        return;
    }
    let merged = |field: &str| incoming.get(field).or_else(|| stored.get(field));
    let one_sided = |a: &str, b: &str| incoming.contains_key(a) != incoming.contains_key(b);

    if one_sided("from_date", "upto_date") {
        let from = merged("from_date").and_then(payload_timestamp);
        let upto = merged("upto_date").and_then(payload_timestamp);
        if let (Some(from), Some(upto)) = (from, upto) {
            if upto <= from {
                result.error(FieldViolation::new(
                    "upto_date",
                    RULE_CROSS_FIELD,
                    "upto_date must be later than from_date, including the stored value",
                ));
            }
        }
    }
    if one_sided("grace_time", "plan_duration") {
        let grace = merged("grace_time").and_then(Value::as_i64);
        let plan = merged("plan_duration").and_then(Value::as_i64);
        if let (Some(grace), Some(plan)) = (grace, plan) {
            if grace > plan {
                result.error(FieldViolation::new(
                    "grace_time",
                    RULE_CROSS_FIELD,
                    "grace_time cannot exceed plan_duration, including the stored value",
                ));
            }
        }
    }
}

fn payload_timestamp(value: &Value) -> Option<Timestamp> {
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn self_parent_check(row: &TypedRow, code: &str, parent: &str, result: &mut ValidationResult) {
    if let (Some(code_value), Some(parent_value)) = (row.text(code), row.text(parent)) {
        if code_value == parent_value {
            result.error(FieldViolation::new(
                parent,
                RULE_CROSS_FIELD,
                format!("{parent} cannot be the record's own code"),
            ));
        }
    }
}
