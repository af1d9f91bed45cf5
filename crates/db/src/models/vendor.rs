//! Vendors (service providers).

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `vendors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Vendor {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub type_id: Option<DbId>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub enable: bool,
    pub show_to_all_sites: bool,
    pub client_id: DbId,
    /// `None` for client-wide vendors.
    pub bu_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a vendor; the import payload deserializes into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateVendor {
    pub code: String,
    pub name: String,
    pub type_id: Option<DbId>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub enable: Option<bool>,
    pub show_to_all_sites: Option<bool>,
    pub client_id: DbId,
    pub bu_id: Option<DbId>,
}

/// DTO for updating a vendor. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateVendor {
    pub name: Option<String>,
    pub type_id: Option<DbId>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub enable: Option<bool>,
    pub show_to_all_sites: Option<bool>,
    pub bu_id: Option<DbId>,
}
