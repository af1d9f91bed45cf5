//! Repository for the `locations` table.

use facility_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::location::{CreateLocation, Location, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, status, type_id, parent_id, is_critical, enable, \
                        gps_lat, gps_lng, client_id, bu_id, created_by, modified_by, \
                        created_at, updated_at";

/// Provides access to locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Find a location by its natural key, enabled or not.
    pub async fn find_by_code(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        code: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM locations
             WHERE client_id = $1 AND bu_id = $2 AND upper(code) = upper($3)"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(client_id)
            .bind(bu_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Id of an enabled location, for reference resolution.
    pub async fn find_id_by_code(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM locations
             WHERE client_id = $1 AND bu_id = $2 AND upper(code) = upper($3) AND enable = true",
        )
        .bind(client_id)
        .bind(bu_id)
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Insert a location inside an open transaction.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateLocation,
        created_by: Option<DbId>,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations
                (code, name, status, type_id, parent_id, is_critical, enable,
                 gps_lat, gps_lng, client_id, bu_id, created_by, modified_by)
             VALUES ($1, $2, COALESCE($3, 'WORKING'), $4, $5, COALESCE($6, false),
                     COALESCE($7, true), $8, $9, $10, $11, $12, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.type_id)
            .bind(input.parent_id)
            .bind(input.is_critical)
            .bind(input.enable)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(input.client_id)
            .bind(input.bu_id)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update a location inside an open transaction. Only non-`None` fields
    /// are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateLocation,
        modified_by: Option<DbId>,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                type_id = COALESCE($4, type_id),
                parent_id = COALESCE($5, parent_id),
                is_critical = COALESCE($6, is_critical),
                enable = COALESCE($7, enable),
                gps_lat = COALESCE($8, gps_lat),
                gps_lng = COALESCE($9, gps_lng),
                modified_by = $10
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.status)
            .bind(input.type_id)
            .bind(input.parent_id)
            .bind(input.is_critical)
            .bind(input.enable)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(modified_by)
            .fetch_optional(&mut **tx)
            .await
    }
}
