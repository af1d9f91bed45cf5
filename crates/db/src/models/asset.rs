//! Assets and checkpoints.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub code: String,
    pub name: String,
    /// `ASSET` or `CHECKPOINT`.
    pub identifier: String,
    pub running_status: String,
    pub is_critical: bool,
    pub enable: bool,
    pub capacity: f64,
    pub type_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub subcategory_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub client_id: DbId,
    pub bu_id: DbId,
    pub created_by: Option<DbId>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an asset; the import payload deserializes into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub code: String,
    pub name: String,
    pub identifier: Option<String>,
    pub running_status: Option<String>,
    pub is_critical: Option<bool>,
    pub enable: Option<bool>,
    pub capacity: Option<f64>,
    pub type_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub subcategory_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub client_id: DbId,
    pub bu_id: DbId,
}

/// DTO for updating an asset. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAsset {
    pub name: Option<String>,
    pub identifier: Option<String>,
    pub running_status: Option<String>,
    pub is_critical: Option<bool>,
    pub enable: Option<bool>,
    pub capacity: Option<f64>,
    pub type_id: Option<DbId>,
    pub category_id: Option<DbId>,
    pub subcategory_id: Option<DbId>,
    pub brand_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
}
