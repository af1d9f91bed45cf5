//! Field-level comparison between a stored record and an incoming update row.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload keys never compared: identity, tenant and audit columns.
pub const IGNORED_FIELDS: &[&str] = &[
    "id",
    "client_id",
    "created_by",
    "modified_by",
    "created_at",
    "updated_at",
];

/// Field-level diff between the stored and the incoming value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDiff {
    pub field: String,
    pub current_value: Option<Value>,
    pub incoming_value: Value,
}

/// Compare an incoming payload against the stored record.
///
/// Only keys present in `incoming` are considered, so an update row that
/// omits an optional column leaves that column untouched. Numbers compare by
/// value (`5` equals `5.0`).
pub fn detect_changes(
    existing: &serde_json::Map<String, Value>,
    incoming: &serde_json::Map<String, Value>,
    ignore_fields: &[&str],
) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    for (key, incoming_val) in incoming {
        if ignore_fields.contains(&key.as_str()) {
            continue;
        }
        let current = existing.get(key);
        let same = match current {
            Some(current) => values_equal(current, incoming_val),
            None => incoming_val.is_null(),
        };
        if !same {
            diffs.push(FieldDiff {
                field: key.clone(),
                current_value: current.cloned(),
                incoming_value: incoming_val.clone(),
            });
        }
    }

    diffs
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(pairs: &[(&str, Value)]) -> serde_json::Map<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn no_changes_when_same() {
        let existing = map(&[("name", json!("Pump"))]);
        let incoming = map(&[("name", json!("Pump"))]);
        assert!(detect_changes(&existing, &incoming, IGNORED_FIELDS).is_empty());
    }

    #[test]
    fn detects_changed_field() {
        let existing = map(&[("name", json!("Pump"))]);
        let incoming = map(&[("name", json!("Main Pump"))]);
        let diffs = detect_changes(&existing, &incoming, IGNORED_FIELDS);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].field, "name");
        assert_eq!(diffs[0].current_value, Some(json!("Pump")));
        assert_eq!(diffs[0].incoming_value, json!("Main Pump"));
    }

    #[test]
    fn ignores_identity_and_audit_fields() {
        let existing = map(&[("id", json!(1)), ("client_id", json!(1))]);
        let incoming = map(&[("id", json!(2)), ("client_id", json!(3))]);
        assert!(detect_changes(&existing, &incoming, IGNORED_FIELDS).is_empty());
    }

    #[test]
    fn integer_and_float_compare_by_value() {
        let existing = map(&[("capacity", json!(5.0))]);
        let incoming = map(&[("capacity", json!(5))]);
        assert!(detect_changes(&existing, &incoming, IGNORED_FIELDS).is_empty());
    }

    #[test]
    fn field_missing_from_existing_counts_as_change() {
        let existing = map(&[]);
        let incoming = map(&[("brand_id", json!(7))]);
        let diffs = detect_changes(&existing, &incoming, IGNORED_FIELDS);
        assert_eq!(diffs.len(), 1);
        assert_eq!(diffs[0].current_value, None);
    }
}
