//! Static and conditional default injection.

use super::columns::{columns_for, DefaultValue};
use super::fields::{FieldValue, TypedRow};
use super::resource::{
    ImportMode, ResourceKind, JOB_IDENTIFIER_EXTERNAL_TOUR, JOB_IDENTIFIER_INTERNAL_TOUR,
    JOB_IDENTIFIER_TASK,
};

impl From<DefaultValue> for FieldValue {
    fn from(value: DefaultValue) -> Self {
        match value {
            DefaultValue::Bool(b) => FieldValue::Bool(b),
            DefaultValue::Int(n) => FieldValue::Int(n),
            DefaultValue::Float(f) => FieldValue::Float(f),
            DefaultValue::Choice(s) => FieldValue::Text(s.to_string()),
        }
    }
}

/// Fill absent cells and derive payload-only values.
///
/// Static template defaults only apply when creating; an update leaves absent
/// columns untouched. Derived values are computed in both modes from
/// whatever the row carries.
pub fn apply_defaults(kind: ResourceKind, mode: ImportMode, row: &mut TypedRow) {
    if mode == ImportMode::Create {
        for column in columns_for(kind) {
            if let Some(default) = column.default {
                row.values
                    .entry(column.name)
                    .or_insert_with(|| default.into());
            }
        }
    }

    match kind {
        ResourceKind::Task => {
            row.derived.insert(
                "identifier",
                FieldValue::Text(JOB_IDENTIFIER_TASK.to_string()),
            );
        }
        ResourceKind::Tour => {
            if let Some(tour_type) = row.text("tour_type") {
                let identifier = match tour_type {
                    "EXTERNAL" => JOB_IDENTIFIER_EXTERNAL_TOUR,
                    _ => JOB_IDENTIFIER_INTERNAL_TOUR,
                };
                row.derived
                    .insert("identifier", FieldValue::Text(identifier.to_string()));
            }
        }
        ResourceKind::Vendor => {
            // Vendors without a site are visible client-wide unless the row
            // says otherwise.
            if mode == ImportMode::Create && !row.contains("show_to_all_sites") {
                let client_wide = !row.contains("site_code");
                row.values
                    .insert("show_to_all_sites", FieldValue::Bool(client_wide));
            }
        }
        ResourceKind::Asset | ResourceKind::Location => {}
    }
}
