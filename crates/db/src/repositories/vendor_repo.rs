//! Repository for the `vendors` table.

use facility_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::vendor::{CreateVendor, UpdateVendor, Vendor};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, type_id, address, email, mobile_no, gps_lat, gps_lng, \
                        enable, show_to_all_sites, client_id, bu_id, created_by, modified_by, \
                        created_at, updated_at";

/// Provides access to vendors.
pub struct VendorRepo;

impl VendorRepo {
    /// Find a vendor by code within a client. Vendor codes are unique per
    /// client regardless of site.
    pub async fn find_by_code(
        pool: &PgPool,
        client_id: DbId,
        code: &str,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vendors WHERE client_id = $1 AND upper(code) = upper($2)"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(client_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Insert a vendor inside an open transaction.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateVendor,
        created_by: Option<DbId>,
    ) -> Result<Vendor, sqlx::Error> {
        let query = format!(
            "INSERT INTO vendors
                (code, name, type_id, address, email, mobile_no, gps_lat, gps_lng, enable,
                 show_to_all_sites, client_id, bu_id, created_by, modified_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, true),
                     COALESCE($10, $12::BIGINT IS NULL), $11, $12, $13, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.type_id)
            .bind(&input.address)
            .bind(&input.email)
            .bind(&input.mobile_no)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(input.enable)
            .bind(input.show_to_all_sites)
            .bind(input.client_id)
            .bind(input.bu_id)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update a vendor inside an open transaction. Only non-`None` fields are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateVendor,
        modified_by: Option<DbId>,
    ) -> Result<Option<Vendor>, sqlx::Error> {
        let query = format!(
            "UPDATE vendors SET
                name = COALESCE($2, name),
                type_id = COALESCE($3, type_id),
                address = COALESCE($4, address),
                email = COALESCE($5, email),
                mobile_no = COALESCE($6, mobile_no),
                gps_lat = COALESCE($7, gps_lat),
                gps_lng = COALESCE($8, gps_lng),
                enable = COALESCE($9, enable),
                show_to_all_sites = COALESCE($10, show_to_all_sites),
                bu_id = COALESCE($11, bu_id),
                modified_by = $12
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Vendor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.type_id)
            .bind(&input.address)
            .bind(&input.email)
            .bind(&input.mobile_no)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(input.enable)
            .bind(input.show_to_all_sites)
            .bind(input.bu_id)
            .bind(modified_by)
            .fetch_optional(&mut **tx)
            .await
    }
}
