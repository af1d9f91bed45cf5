//! Repository for the `jobs` table (tasks and tours).

use facility_core::import::resource::{
    JOB_IDENTIFIER_EXTERNAL_TOUR, JOB_IDENTIFIER_INTERNAL_TOUR, JOB_IDENTIFIER_TASK,
};
use facility_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::job::{CreateJob, Job, UpdateJob};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, identifier, cron_expression, from_date, upto_date, \
                        plan_duration, grace_time, expiry_time, priority, scan_type, asset_id, \
                        people_id, ticket_category_id, enable, client_id, bu_id, created_by, \
                        modified_by, created_at, updated_at";

/// Provides access to scheduled jobs.
pub struct JobRepo;

impl JobRepo {
    /// Find a task by name within a site (case-insensitive).
    pub async fn find_task_by_name(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        name: &str,
    ) -> Result<Option<Job>, sqlx::Error> {
        Self::find_by_name(pool, client_id, bu_id, name, &[JOB_IDENTIFIER_TASK]).await
    }

    /// Find a tour of either kind by name within a site (case-insensitive).
    ///
    /// Internal and external tours share one name space for imports; the
    /// oldest match wins if both exist.
    pub async fn find_tour_by_name(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        name: &str,
    ) -> Result<Option<Job>, sqlx::Error> {
        Self::find_by_name(
            pool,
            client_id,
            bu_id,
            name,
            &[JOB_IDENTIFIER_INTERNAL_TOUR, JOB_IDENTIFIER_EXTERNAL_TOUR],
        )
        .await
    }

    async fn find_by_name(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        name: &str,
        identifiers: &[&str],
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM jobs
             WHERE client_id = $1 AND bu_id = $2
               AND lower(name) = lower($3) AND identifier = ANY($4)
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(client_id)
            .bind(bu_id)
            .bind(name)
            .bind(identifiers)
            .fetch_optional(pool)
            .await
    }

    /// Insert a job inside an open transaction.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateJob,
        created_by: Option<DbId>,
    ) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs
                (name, description, identifier, cron_expression, from_date, upto_date,
                 plan_duration, grace_time, expiry_time, priority, scan_type, asset_id,
                 people_id, ticket_category_id, enable, client_id, bu_id,
                 created_by, modified_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), COALESCE($9, 0),
                     COALESCE($10, 'LOW'), COALESCE($11, 'SKIP'), $12, $13, $14,
                     COALESCE($15, true), $16, $17, $18, $18)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.identifier)
            .bind(&input.cron_expression)
            .bind(input.from_date)
            .bind(input.upto_date)
            .bind(input.plan_duration)
            .bind(input.grace_time)
            .bind(input.expiry_time)
            .bind(&input.priority)
            .bind(&input.scan_type)
            .bind(input.asset_id)
            .bind(input.people_id)
            .bind(input.ticket_category_id)
            .bind(input.enable)
            .bind(input.client_id)
            .bind(input.bu_id)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update a job inside an open transaction. Only non-`None` fields are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateJob,
        modified_by: Option<DbId>,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET
                description = COALESCE($2, description),
                identifier = COALESCE($3, identifier),
                cron_expression = COALESCE($4, cron_expression),
                from_date = COALESCE($5, from_date),
                upto_date = COALESCE($6, upto_date),
                plan_duration = COALESCE($7, plan_duration),
                grace_time = COALESCE($8, grace_time),
                expiry_time = COALESCE($9, expiry_time),
                priority = COALESCE($10, priority),
                scan_type = COALESCE($11, scan_type),
                asset_id = COALESCE($12, asset_id),
                people_id = COALESCE($13, people_id),
                ticket_category_id = COALESCE($14, ticket_category_id),
                enable = COALESCE($15, enable),
                modified_by = $16
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(&input.identifier)
            .bind(&input.cron_expression)
            .bind(input.from_date)
            .bind(input.upto_date)
            .bind(input.plan_duration)
            .bind(input.grace_time)
            .bind(input.expiry_time)
            .bind(&input.priority)
            .bind(&input.scan_type)
            .bind(input.asset_id)
            .bind(input.people_id)
            .bind(input.ticket_category_id)
            .bind(input.enable)
            .bind(modified_by)
            .fetch_optional(&mut **tx)
            .await
    }
}
