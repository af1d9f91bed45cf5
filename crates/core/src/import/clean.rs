//! Row cleaner: header normalisation and cell text normalisation.

use std::collections::BTreeMap;

use serde_json::Value;

use super::columns::{canonical_header, find_column};
use super::resource::ResourceKind;
use super::RawRow;
use crate::validation::rules::{
    FieldViolation, ValidationResult, RULE_UNKNOWN_COLUMN, RULE_UNSUPPORTED_VALUE,
};

/// Cell literals treated as an empty cell.
const EMPTY_MARKERS: &[&str] = &["none", "null", "n/a"];

/// A row after cleaning: canonical column name → non-empty trimmed text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanRow {
    pub cells: BTreeMap<&'static str, String>,
}

impl CleanRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// Normalise a spreadsheet header: `"Asset Code*"` → `"asset_code"`.
pub fn normalize_header(header: &str) -> String {
    let trimmed = header.trim().trim_end_matches('*').trim();
    let mut out = String::with_capacity(trimmed.len());
    let mut pending_sep = false;
    for ch in trimmed.chars() {
        if ch.is_whitespace() || ch == '-' || ch == '.' || ch == '_' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('_');
                pending_sep = false;
            }
            out.extend(ch.to_lowercase());
        }
    }
    out
}

/// Collapse internal whitespace runs and trim.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Convert one cell to text. `Ok(None)` means the cell is empty.
fn cell_text(value: &Value) -> Result<Option<String>, ()> {
    let text = match value {
        Value::Null => return Ok(None),
        Value::String(s) => collapse_whitespace(s),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(_) | Value::Object(_) => return Err(()),
    };
    if text.is_empty() || EMPTY_MARKERS.contains(&text.to_lowercase().as_str()) {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

/// Clean a raw row against a resource template.
///
/// Unknown headers are dropped with a warning; array/object cells are
/// errors. When two headers normalise to the same column the first non-empty
/// cell wins.
pub fn clean_row(kind: ResourceKind, raw: &RawRow, result: &mut ValidationResult) -> CleanRow {
    let mut row = CleanRow::default();

    for (header, value) in raw {
        let normalized = normalize_header(header);
        let canonical = canonical_header(&normalized);
        let Some(column) = find_column(kind, canonical) else {
            result.warning(FieldViolation::new(
                header,
                RULE_UNKNOWN_COLUMN,
                format!("Column '{header}' is not part of the {kind} template and was ignored"),
            ));
            continue;
        };

        match cell_text(value) {
            Ok(Some(text)) => {
                row.cells.entry(column.name).or_insert(text);
            }
            Ok(None) => {}
            Err(()) => result.error(
                FieldViolation::new(
                    column.name,
                    RULE_UNSUPPORTED_VALUE,
                    format!("{} must be a single value", column.name),
                )
                .with_value(value.clone()),
            ),
        }
    }

    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn header_normalisation() {
        assert_eq!(normalize_header("Asset Code*"), "asset_code");
        assert_eq!(normalize_header("  GPS  Location "), "gps_location");
        assert_eq!(normalize_header("parent-asset.code"), "parent_asset_code");
        assert_eq!(normalize_header("client_code"), "client_code");
        assert_eq!(normalize_header("__Site__"), "site");
    }

    #[test]
    fn cells_are_trimmed_and_collapsed() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Asset,
            &raw(&[("Asset Name*", json!("  Main   Pump "))]),
            &mut result,
        );
        assert_eq!(row.get("asset_name"), Some("Main Pump"));
        assert!(result.is_valid);
    }

    #[test]
    fn empty_markers_are_dropped() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Asset,
            &raw(&[
                ("brand", json!("NONE")),
                ("unit", json!("")),
                ("category", Value::Null),
                ("sub_category", json!("n/a")),
            ]),
            &mut result,
        );
        assert!(row.cells.is_empty());
    }

    #[test]
    fn look_alike_values_are_kept() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Location,
            &raw(&[("location_code", json!("NA")), ("location_name", json!("-"))]),
            &mut result,
        );
        assert_eq!(row.get("location_code"), Some("NA"));
        assert_eq!(row.get("location_name"), Some("-"));
    }

    #[test]
    fn numbers_and_booleans_become_text() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Asset,
            &raw(&[("capacity", json!(12.5)), ("enable", json!(false))]),
            &mut result,
        );
        assert_eq!(row.get("capacity"), Some("12.5"));
        assert_eq!(row.get("enable"), Some("false"));
    }

    #[test]
    fn unknown_columns_warn() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Vendor,
            &raw(&[("favourite colour", json!("blue"))]),
            &mut result,
        );
        assert!(row.cells.is_empty());
        assert!(result.is_valid);
        assert_eq!(result.warnings[0].rule_type, RULE_UNKNOWN_COLUMN);
    }

    #[test]
    fn aliases_map_to_canonical_columns() {
        let mut result = ValidationResult::new();
        let row = clean_row(
            ResourceKind::Location,
            &raw(&[("Site", json!("hq")), ("Client", json!("acme"))]),
            &mut result,
        );
        assert_eq!(row.get("site_code"), Some("hq"));
        assert_eq!(row.get("client_code"), Some("acme"));
    }

    #[test]
    fn nested_values_are_errors() {
        let mut result = ValidationResult::new();
        clean_row(
            ResourceKind::Asset,
            &raw(&[("asset_name", json!(["a", "b"]))]),
            &mut result,
        );
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].rule_type, RULE_UNSUPPORTED_VALUE);
    }
}
