//! Tenant-scoped code → id resolution.
//!
//! The pipeline never touches the database directly. It asks a
//! [`ReferenceResolver`] for ids and for the stored record a row would
//! update; `facility-db` provides the PostgreSQL implementation.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::columns::RefTarget;
use super::resource::ResourceKind;
use crate::error::CoreError;
use crate::types::DbId;

/// A single code lookup. Every variant below `Client` is scoped by tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Lookup {
    Client {
        code: String,
    },
    Site {
        client_id: DbId,
        code: String,
    },
    TypeAssist {
        client_id: DbId,
        tatype: &'static str,
        code: String,
    },
    People {
        client_id: DbId,
        code: String,
    },
    Asset {
        client_id: DbId,
        bu_id: DbId,
        code: String,
    },
    Location {
        client_id: DbId,
        bu_id: DbId,
        code: String,
    },
}

impl Lookup {
    /// Build an entity reference lookup. Asset and location references need
    /// a resolved site; `None` is returned when it is missing.
    pub fn reference(
        target: RefTarget,
        client_id: DbId,
        bu_id: Option<DbId>,
        code: String,
    ) -> Option<Self> {
        match target {
            RefTarget::People => Some(Self::People { client_id, code }),
            RefTarget::Asset => bu_id.map(|bu_id| Self::Asset {
                client_id,
                bu_id,
                code,
            }),
            RefTarget::Location => bu_id.map(|bu_id| Self::Location {
                client_id,
                bu_id,
                code,
            }),
        }
    }

    /// The code being looked up.
    pub fn code(&self) -> &str {
        match self {
            Self::Client { code }
            | Self::Site { code, .. }
            | Self::TypeAssist { code, .. }
            | Self::People { code, .. }
            | Self::Asset { code, .. }
            | Self::Location { code, .. } => code,
        }
    }

    /// Human-readable name of the looked-up entity.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Client { .. } => "client",
            Self::Site { .. } => "site",
            Self::TypeAssist { .. } => "type assist",
            Self::People { .. } => "person",
            Self::Asset { .. } => "asset",
            Self::Location { .. } => "location",
        }
    }
}

/// Identity of a record within its tenant: client, site (for site-scoped
/// resources) and the natural key (code, or name for jobs).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NaturalKey {
    pub client_id: DbId,
    pub bu_id: Option<DbId>,
    pub key: String,
}

/// A stored record as seen by the update diff: id plus payload-keyed fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingRecord {
    pub id: DbId,
    pub fields: Map<String, Value>,
}

/// Source of ids and stored records for the import pipeline.
#[async_trait]
pub trait ReferenceResolver: Send {
    /// Resolve a code to an id. `Ok(None)` means no enabled match.
    async fn lookup(&mut self, lookup: &Lookup) -> Result<Option<DbId>, CoreError>;

    /// Find the stored record a row with this natural key refers to.
    async fn find_existing(
        &mut self,
        resource: ResourceKind,
        key: &NaturalKey,
    ) -> Result<Option<ExistingRecord>, CoreError>;
}
