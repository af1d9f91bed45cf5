//! Clients (tenants) and sites.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const BU_IDENTIFIER_CLIENT: &str = "CLIENT";
pub const BU_IDENTIFIER_SITE: &str = "SITE";

/// A row from the `business_units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BusinessUnit {
    pub id: DbId,
    pub bucode: String,
    pub buname: String,
    /// `CLIENT` or `SITE`.
    pub identifier: String,
    /// For a site, the owning client.
    pub parent_id: Option<DbId>,
    pub enable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a client or site.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBusinessUnit {
    pub bucode: String,
    pub buname: String,
    pub identifier: String,
    pub parent_id: Option<DbId>,
}
