//! Scheduled jobs: tasks and tours.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// `TASK`, `INTERNALTOUR` or `EXTERNALTOUR`.
    pub identifier: String,
    pub cron_expression: String,
    pub from_date: Timestamp,
    pub upto_date: Timestamp,
    /// Minutes.
    pub plan_duration: i32,
    pub grace_time: i32,
    pub expiry_time: i32,
    pub priority: String,
    pub scan_type: String,
    pub asset_id: Option<DbId>,
    pub people_id: Option<DbId>,
    pub ticket_category_id: Option<DbId>,
    pub enable: bool,
    pub client_id: DbId,
    pub bu_id: DbId,
    pub created_by: Option<DbId>,
    pub modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a job; the import payload deserializes into it.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub name: String,
    pub description: Option<String>,
    pub identifier: String,
    pub cron_expression: String,
    pub from_date: Timestamp,
    pub upto_date: Timestamp,
    pub plan_duration: i32,
    pub grace_time: Option<i32>,
    pub expiry_time: Option<i32>,
    pub priority: Option<String>,
    pub scan_type: Option<String>,
    pub asset_id: Option<DbId>,
    pub people_id: Option<DbId>,
    pub ticket_category_id: Option<DbId>,
    pub enable: Option<bool>,
    pub client_id: DbId,
    pub bu_id: DbId,
}

/// DTO for updating a job. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateJob {
    pub description: Option<String>,
    pub identifier: Option<String>,
    pub cron_expression: Option<String>,
    pub from_date: Option<Timestamp>,
    pub upto_date: Option<Timestamp>,
    pub plan_duration: Option<i32>,
    pub grace_time: Option<i32>,
    pub expiry_time: Option<i32>,
    pub priority: Option<String>,
    pub scan_type: Option<String>,
    pub asset_id: Option<DbId>,
    pub people_id: Option<DbId>,
    pub ticket_category_id: Option<DbId>,
    pub enable: Option<bool>,
}
