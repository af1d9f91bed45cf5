//! Login attempt log.

use facility_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rate_limit_attempts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RateLimitAttempt {
    pub id: DbId,
    pub username: String,
    pub ip_address: String,
    pub success: bool,
    pub attempted_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRateLimitAttempt {
    pub username: String,
    pub ip_address: String,
    pub success: bool,
}

/// Failed attempts inside the throttle window.
#[derive(Debug, Clone, Copy, Default, FromRow)]
pub struct FailureSummary {
    pub failures: i64,
    pub oldest_failure: Option<Timestamp>,
}

impl From<FailureSummary> for facility_core::rate_limit::FailureWindow {
    fn from(summary: FailureSummary) -> Self {
        Self {
            failures: summary.failures,
            oldest_failure: summary.oldest_failure,
        }
    }
}
