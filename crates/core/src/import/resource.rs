//! Importable resources and import modes.

use serde::{Deserialize, Serialize};

/// Default cap on rows per import request.
pub const DEFAULT_MAX_ROWS: usize = 5000;

/// Default dialling prefix added to bare ten-digit mobile numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Job identifier stored for task rows.
pub const JOB_IDENTIFIER_TASK: &str = "TASK";
pub const JOB_IDENTIFIER_INTERNAL_TOUR: &str = "INTERNALTOUR";
pub const JOB_IDENTIFIER_EXTERNAL_TOUR: &str = "EXTERNALTOUR";

/// An entity that can be bulk imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Asset,
    Location,
    Task,
    Tour,
    Vendor,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        Self::Asset,
        Self::Location,
        Self::Task,
        Self::Tour,
        Self::Vendor,
    ];

    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Location => "location",
            Self::Task => "task",
            Self::Tour => "tour",
            Self::Vendor => "vendor",
        }
    }

    /// Parse a URL path segment.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    /// Whether rows of this resource must name a site.
    pub fn requires_site(&self) -> bool {
        !matches!(self, Self::Vendor)
    }

    /// Whether the natural key is a free-text name rather than a code.
    pub fn keyed_by_name(&self) -> bool {
        matches!(self, Self::Task | Self::Tour)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether rows create new records or update existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    #[default]
    Create,
    Update,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Tunables applied to every import run.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub max_rows: usize,
    pub default_country_code: String,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            default_country_code: DEFAULT_COUNTRY_CODE.to_string(),
        }
    }
}
