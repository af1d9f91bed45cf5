//! People (users of the platform).

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full row from the `people` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`PeopleResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct People {
    pub id: DbId,
    pub peoplecode: String,
    pub peoplename: String,
    pub loginid: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub enable: bool,
    pub client_id: DbId,
    pub bu_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct PeopleResponse {
    pub id: DbId,
    pub peoplecode: String,
    pub peoplename: String,
    pub loginid: String,
    pub email: Option<String>,
    /// `admin` or `user`.
    pub role: String,
    pub client_id: DbId,
    pub bu_id: Option<DbId>,
}

impl From<&People> for PeopleResponse {
    fn from(p: &People) -> Self {
        Self {
            id: p.id,
            peoplecode: p.peoplecode.clone(),
            peoplename: p.peoplename.clone(),
            loginid: p.loginid.clone(),
            email: p.email.clone(),
            role: facility_core::roles::role_for(p.is_admin).to_string(),
            client_id: p.client_id,
            bu_id: p.bu_id,
        }
    }
}

/// DTO for creating a person. The password must already be hashed.
#[derive(Debug, Deserialize)]
pub struct CreatePeople {
    pub peoplecode: String,
    pub peoplename: String,
    pub loginid: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub is_admin: bool,
    pub client_id: DbId,
    pub bu_id: Option<DbId>,
}
