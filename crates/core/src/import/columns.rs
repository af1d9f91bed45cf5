//! Column templates for each importable resource.
//!
//! A template is the ordered list of spreadsheet columns a resource accepts,
//! how each cell is parsed, and which database payload key it feeds.

use serde::Serialize;

use super::resource::ResourceKind;

// ── Choice sets ──────────────────────────────────────────────────────

pub const ASSET_IDENTIFIERS: &[&str] = &["ASSET", "CHECKPOINT"];
pub const RUNNING_STATUSES: &[&str] = &["WORKING", "MAINTENANCE", "STANDBY", "SCRAPPED"];
pub const LOCATION_STATUSES: &[&str] = &["WORKING", "MAINTENANCE", "SCRAPPED"];
pub const PRIORITIES: &[&str] = &["HIGH", "MEDIUM", "LOW"];
pub const SCAN_TYPES: &[&str] = &["QR", "NFC", "SKIP", "ENTERED"];
pub const TOUR_TYPES: &[&str] = &["INTERNAL", "EXTERNAL"];

// ── Type-assist categories ───────────────────────────────────────────

pub const TA_ASSET_TYPE: &str = "ASSETTYPE";
pub const TA_ASSET_CATEGORY: &str = "ASSETCATEGORY";
pub const TA_ASSET_SUBCATEGORY: &str = "ASSETSUBCATEGORY";
pub const TA_BRAND: &str = "BRAND";
pub const TA_UNIT: &str = "UNIT";
pub const TA_LOCATION_TYPE: &str = "LOCATIONTYPE";
pub const TA_VENDOR_TYPE: &str = "VENDORTYPE";
pub const TA_TICKET_CATEGORY: &str = "TICKETCATEGORY";

/// Maximum length of any code column.
pub const MAX_CODE_LEN: usize = 50;

/// Entity tables a reference column can point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefTarget {
    People,
    Asset,
    Location,
}

/// How a cell is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Client (tenant) business-unit code.
    Client,
    /// Site business-unit code under the row's client.
    Site,
    Code,
    Text { max_len: usize },
    Int { min: i64 },
    Float { min: f64 },
    Bool,
    DateTime,
    Choice { values: &'static [&'static str] },
    Cron,
    Gps,
    Email,
    Phone,
    /// Type-assist code of the given category, scoped by client.
    TypeAssist { tatype: &'static str },
    /// Code of another entity, scoped by client (and site for assets/locations).
    Reference { target: RefTarget },
}

impl ColumnKind {
    /// Whether the cell holds a code that resolves to a database id.
    pub fn resolves(&self) -> bool {
        matches!(
            self,
            Self::Client | Self::Site | Self::TypeAssist { .. } | Self::Reference { .. }
        )
    }
}

/// Static default applied to an absent cell in create mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Choice(&'static str),
}

/// One column of an import template.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ColumnSpec {
    /// Canonical (normalised) header name.
    pub name: &'static str,
    pub kind: ColumnKind,
    /// Required when creating.
    pub required: bool,
    /// Natural-key column, required in every mode.
    pub key: bool,
    /// Payload key written to the database; `None` for columns that only
    /// feed derived values.
    pub target: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultValue>,
}

const fn req(name: &'static str, kind: ColumnKind, target: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required: true,
        key: false,
        target: Some(target),
        default: None,
    }
}

const fn opt(name: &'static str, kind: ColumnKind, target: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required: false,
        key: false,
        target: Some(target),
        default: None,
    }
}

const fn key(name: &'static str, kind: ColumnKind, target: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required: true,
        key: true,
        target: Some(target),
        default: None,
    }
}

const fn dflt(
    name: &'static str,
    kind: ColumnKind,
    target: &'static str,
    default: DefaultValue,
) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        required: false,
        key: false,
        target: Some(target),
        default: Some(default),
    }
}

const CLIENT: ColumnSpec = req("client_code", ColumnKind::Client, "client_id");
const SITE: ColumnSpec = req("site_code", ColumnKind::Site, "bu_id");
const ENABLE: ColumnSpec = dflt("enable", ColumnKind::Bool, "enable", DefaultValue::Bool(true));
const IS_CRITICAL: ColumnSpec = dflt(
    "is_critical",
    ColumnKind::Bool,
    "is_critical",
    DefaultValue::Bool(false),
);
const GPS: ColumnSpec = opt("gps_location", ColumnKind::Gps, "gps");

static ASSET_COLUMNS: &[ColumnSpec] = &[
    CLIENT,
    SITE,
    key("asset_code", ColumnKind::Code, "code"),
    req("asset_name", ColumnKind::Text { max_len: 200 }, "name"),
    req(
        "asset_type",
        ColumnKind::TypeAssist { tatype: TA_ASSET_TYPE },
        "type_id",
    ),
    dflt(
        "identifier",
        ColumnKind::Choice { values: ASSET_IDENTIFIERS },
        "identifier",
        DefaultValue::Choice("ASSET"),
    ),
    dflt(
        "running_status",
        ColumnKind::Choice { values: RUNNING_STATUSES },
        "running_status",
        DefaultValue::Choice("WORKING"),
    ),
    opt(
        "category",
        ColumnKind::TypeAssist { tatype: TA_ASSET_CATEGORY },
        "category_id",
    ),
    opt(
        "sub_category",
        ColumnKind::TypeAssist { tatype: TA_ASSET_SUBCATEGORY },
        "subcategory_id",
    ),
    opt("brand", ColumnKind::TypeAssist { tatype: TA_BRAND }, "brand_id"),
    opt("unit", ColumnKind::TypeAssist { tatype: TA_UNIT }, "unit_id"),
    dflt(
        "capacity",
        ColumnKind::Float { min: 0.0 },
        "capacity",
        DefaultValue::Float(0.0),
    ),
    IS_CRITICAL,
    ENABLE,
    opt(
        "location_code",
        ColumnKind::Reference { target: RefTarget::Location },
        "location_id",
    ),
    opt(
        "parent_asset_code",
        ColumnKind::Reference { target: RefTarget::Asset },
        "parent_id",
    ),
    GPS,
];

static LOCATION_COLUMNS: &[ColumnSpec] = &[
    CLIENT,
    SITE,
    key("location_code", ColumnKind::Code, "code"),
    req("location_name", ColumnKind::Text { max_len: 200 }, "name"),
    req(
        "location_type",
        ColumnKind::TypeAssist { tatype: TA_LOCATION_TYPE },
        "type_id",
    ),
    dflt(
        "status",
        ColumnKind::Choice { values: LOCATION_STATUSES },
        "status",
        DefaultValue::Choice("WORKING"),
    ),
    IS_CRITICAL,
    ENABLE,
    opt(
        "parent_location_code",
        ColumnKind::Reference { target: RefTarget::Location },
        "parent_id",
    ),
    GPS,
];

const DESCRIPTION: ColumnSpec = opt(
    "description",
    ColumnKind::Text { max_len: 500 },
    "description",
);
const CRON: ColumnSpec = req("cron", ColumnKind::Cron, "cron_expression");
const FROM_DATE: ColumnSpec = req("from_date", ColumnKind::DateTime, "from_date");
const UPTO_DATE: ColumnSpec = req("upto_date", ColumnKind::DateTime, "upto_date");
const PLAN_DURATION: ColumnSpec = req("plan_duration", ColumnKind::Int { min: 1 }, "plan_duration");
const GRACE_TIME: ColumnSpec = dflt(
    "grace_time",
    ColumnKind::Int { min: 0 },
    "grace_time",
    DefaultValue::Int(0),
);
const EXPIRY_TIME: ColumnSpec = dflt(
    "expiry_time",
    ColumnKind::Int { min: 0 },
    "expiry_time",
    DefaultValue::Int(0),
);
const PRIORITY: ColumnSpec = dflt(
    "priority",
    ColumnKind::Choice { values: PRIORITIES },
    "priority",
    DefaultValue::Choice("LOW"),
);
const PEOPLE: ColumnSpec = req(
    "people_code",
    ColumnKind::Reference { target: RefTarget::People },
    "people_id",
);
const TICKET_CATEGORY: ColumnSpec = opt(
    "ticket_category",
    ColumnKind::TypeAssist { tatype: TA_TICKET_CATEGORY },
    "ticket_category_id",
);

static TASK_COLUMNS: &[ColumnSpec] = &[
    CLIENT,
    SITE,
    key("task_name", ColumnKind::Text { max_len: 200 }, "name"),
    DESCRIPTION,
    CRON,
    FROM_DATE,
    UPTO_DATE,
    PLAN_DURATION,
    GRACE_TIME,
    EXPIRY_TIME,
    PRIORITY,
    dflt(
        "scan_type",
        ColumnKind::Choice { values: SCAN_TYPES },
        "scan_type",
        DefaultValue::Choice("SKIP"),
    ),
    req(
        "asset_code",
        ColumnKind::Reference { target: RefTarget::Asset },
        "asset_id",
    ),
    PEOPLE,
    TICKET_CATEGORY,
    ENABLE,
];

static TOUR_COLUMNS: &[ColumnSpec] = &[
    CLIENT,
    SITE,
    key("tour_name", ColumnKind::Text { max_len: 200 }, "name"),
    ColumnSpec {
        name: "tour_type",
        kind: ColumnKind::Choice { values: TOUR_TYPES },
        required: false,
        key: false,
        target: None,
        default: Some(DefaultValue::Choice("INTERNAL")),
    },
    DESCRIPTION,
    CRON,
    FROM_DATE,
    UPTO_DATE,
    PLAN_DURATION,
    GRACE_TIME,
    EXPIRY_TIME,
    PRIORITY,
    dflt(
        "scan_type",
        ColumnKind::Choice { values: SCAN_TYPES },
        "scan_type",
        DefaultValue::Choice("QR"),
    ),
    PEOPLE,
    TICKET_CATEGORY,
    ENABLE,
];

static VENDOR_COLUMNS: &[ColumnSpec] = &[
    CLIENT,
    opt("site_code", ColumnKind::Site, "bu_id"),
    key("vendor_code", ColumnKind::Code, "code"),
    req("vendor_name", ColumnKind::Text { max_len: 200 }, "name"),
    req(
        "vendor_type",
        ColumnKind::TypeAssist { tatype: TA_VENDOR_TYPE },
        "type_id",
    ),
    opt("address", ColumnKind::Text { max_len: 500 }, "address"),
    opt("email", ColumnKind::Email, "email"),
    opt("mobile_no", ColumnKind::Phone, "mobile_no"),
    GPS,
    ENABLE,
    opt("show_to_all_sites", ColumnKind::Bool, "show_to_all_sites"),
];

/// Alternative headers accepted for canonical column names.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("client", "client_code"),
    ("site", "site_code"),
    ("bu_code", "site_code"),
    ("gps", "gps_location"),
    ("mobile", "mobile_no"),
    ("mobile_number", "mobile_no"),
    ("people", "people_code"),
    ("enabled", "enable"),
];

/// The ordered column template for a resource.
pub fn columns_for(kind: ResourceKind) -> &'static [ColumnSpec] {
    match kind {
        ResourceKind::Asset => ASSET_COLUMNS,
        ResourceKind::Location => LOCATION_COLUMNS,
        ResourceKind::Task => TASK_COLUMNS,
        ResourceKind::Tour => TOUR_COLUMNS,
        ResourceKind::Vendor => VENDOR_COLUMNS,
    }
}

/// Look up a column by canonical name.
pub fn find_column(kind: ResourceKind, name: &str) -> Option<&'static ColumnSpec> {
    columns_for(kind).iter().find(|c| c.name == name)
}

/// The natural-key column of a resource.
pub fn key_column(kind: ResourceKind) -> &'static ColumnSpec {
    columns_for(kind)
        .iter()
        .find(|c| c.key)
        .unwrap_or(&columns_for(kind)[0])
}

/// Resolve a header alias to its canonical name.
pub fn canonical_header(normalized: &str) -> &str {
    HEADER_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(normalized)
}

/// Published description of a resource template.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceTemplate {
    pub resource: ResourceKind,
    pub columns: &'static [ColumnSpec],
}

/// Describe every importable resource.
pub fn templates() -> Vec<ResourceTemplate> {
    ResourceKind::ALL
        .into_iter()
        .map(|resource| ResourceTemplate {
            resource,
            columns: columns_for(resource),
        })
        .collect()
}

/// Header row of the downloadable spreadsheet template.
///
/// Required columns carry a trailing `*`, which the row cleaner strips.
pub fn template_header(kind: ResourceKind) -> String {
    columns_for(kind)
        .iter()
        .map(|c| {
            if c.required {
                format!("{}*", c.name)
            } else {
                c.name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
