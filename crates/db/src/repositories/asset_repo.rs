//! Repository for the `assets` table.

use facility_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::asset::{Asset, CreateAsset, UpdateAsset};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, identifier, running_status, is_critical, enable, capacity, \
                        type_id, category_id, subcategory_id, brand_id, unit_id, location_id, \
                        parent_id, gps_lat, gps_lng, client_id, bu_id, created_by, modified_by, \
                        created_at, updated_at";

/// Provides access to assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Find an asset by its natural key, enabled or not.
    pub async fn find_by_code(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        code: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assets
             WHERE client_id = $1 AND bu_id = $2 AND upper(code) = upper($3)"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(client_id)
            .bind(bu_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Id of an enabled asset, for reference resolution.
    pub async fn find_id_by_code(
        pool: &PgPool,
        client_id: DbId,
        bu_id: DbId,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM assets
             WHERE client_id = $1 AND bu_id = $2 AND upper(code) = upper($3) AND enable = true",
        )
        .bind(client_id)
        .bind(bu_id)
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Insert an asset inside an open transaction.
    pub async fn create(
        tx: &mut Transaction<'_, Postgres>,
        input: &CreateAsset,
        created_by: Option<DbId>,
    ) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets
                (code, name, identifier, running_status, is_critical, enable, capacity,
                 type_id, category_id, subcategory_id, brand_id, unit_id, location_id,
                 parent_id, gps_lat, gps_lng, client_id, bu_id, created_by, modified_by)
             VALUES ($1, $2, COALESCE($3, 'ASSET'), COALESCE($4, 'WORKING'),
                     COALESCE($5, false), COALESCE($6, true), COALESCE($7, 0),
                     $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $19)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.identifier)
            .bind(&input.running_status)
            .bind(input.is_critical)
            .bind(input.enable)
            .bind(input.capacity)
            .bind(input.type_id)
            .bind(input.category_id)
            .bind(input.subcategory_id)
            .bind(input.brand_id)
            .bind(input.unit_id)
            .bind(input.location_id)
            .bind(input.parent_id)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(input.client_id)
            .bind(input.bu_id)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Update an asset inside an open transaction. Only non-`None` fields are
    /// applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        input: &UpdateAsset,
        modified_by: Option<DbId>,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET
                name = COALESCE($2, name),
                identifier = COALESCE($3, identifier),
                running_status = COALESCE($4, running_status),
                is_critical = COALESCE($5, is_critical),
                enable = COALESCE($6, enable),
                capacity = COALESCE($7, capacity),
                type_id = COALESCE($8, type_id),
                category_id = COALESCE($9, category_id),
                subcategory_id = COALESCE($10, subcategory_id),
                brand_id = COALESCE($11, brand_id),
                unit_id = COALESCE($12, unit_id),
                location_id = COALESCE($13, location_id),
                parent_id = COALESCE($14, parent_id),
                gps_lat = COALESCE($15, gps_lat),
                gps_lng = COALESCE($16, gps_lng),
                modified_by = $17
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.identifier)
            .bind(&input.running_status)
            .bind(input.is_critical)
            .bind(input.enable)
            .bind(input.capacity)
            .bind(input.type_id)
            .bind(input.category_id)
            .bind(input.subcategory_id)
            .bind(input.brand_id)
            .bind(input.unit_id)
            .bind(input.location_id)
            .bind(input.parent_id)
            .bind(input.gps_lat)
            .bind(input.gps_lng)
            .bind(modified_by)
            .fetch_optional(&mut **tx)
            .await
    }
}
