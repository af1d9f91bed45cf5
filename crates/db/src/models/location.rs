//! Locations within a site.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub status: String,
    pub type_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub is_critical: bool,
    pub enable: bool,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub client_id: DbId,
    pub bu_id: DbId,
    pub created_by: Option<DbId>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a location; the import payload deserializes into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocation {
    pub code: String,
    pub name: String,
    pub status: Option<String>,
    pub type_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub is_critical: Option<bool>,
    pub enable: Option<bool>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub client_id: DbId,
    pub bu_id: DbId,
}

/// DTO for updating a location. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLocation {
    pub name: Option<String>,
    pub status: Option<String>,
    pub type_id: Option<DbId>,
    pub parent_id: Option<DbId>,
    pub is_critical: Option<bool>,
    pub enable: Option<bool>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
}
