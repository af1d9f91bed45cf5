//! Per-client lookup codes.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `type_assists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TypeAssist {
    pub id: DbId,
    pub tacode: String,
    pub taname: String,
    /// Category, e.g. `ASSETTYPE` or `VENDORTYPE`.
    pub tatype: String,
    pub client_id: DbId,
    pub enable: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTypeAssist {
    pub tacode: String,
    pub taname: String,
    pub tatype: String,
    pub client_id: DbId,
}
