//! Repository for the `rate_limit_attempts` table.

use facility_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::rate_limit::{CreateRateLimitAttempt, FailureSummary, RateLimitAttempt};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, ip_address, success, attempted_at, created_at, updated_at";

/// Records login attempts and summarises recent failures.
pub struct RateLimitRepo;

impl RateLimitRepo {
    /// Record one login attempt.
    pub async fn record(
        pool: &PgPool,
        input: &CreateRateLimitAttempt,
    ) -> Result<RateLimitAttempt, sqlx::Error> {
        let query = format!(
            "INSERT INTO rate_limit_attempts (username, ip_address, success)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RateLimitAttempt>(&query)
            .bind(&input.username)
            .bind(&input.ip_address)
            .bind(input.success)
            .fetch_one(pool)
            .await
    }

    /// Failed attempts since `since` for the username OR the address.
    pub async fn failures_since(
        pool: &PgPool,
        username: &str,
        ip_address: &str,
        since: Timestamp,
    ) -> Result<FailureSummary, sqlx::Error> {
        sqlx::query_as::<_, FailureSummary>(
            "SELECT COUNT(*) AS failures, MIN(attempted_at) AS oldest_failure
             FROM rate_limit_attempts
             WHERE success = false
               AND attempted_at >= $3
               AND (username = $1 OR ip_address = $2)",
        )
        .bind(username)
        .bind(ip_address)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Delete attempts older than `before`. Returns the count of deleted rows.
    pub async fn purge_before(pool: &PgPool, before: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rate_limit_attempts WHERE attempted_at < $1")
            .bind(before)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Clear the failure history of a username after a successful login.
    pub async fn clear_failures(pool: &PgPool, username: &str) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM rate_limit_attempts WHERE username = $1 AND success = false")
                .bind(username)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
