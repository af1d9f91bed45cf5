//! Repository for the `business_units` table.

use facility_core::types::DbId;
use sqlx::PgPool;

use crate::models::business_unit::{
    BusinessUnit, CreateBusinessUnit, BU_IDENTIFIER_CLIENT, BU_IDENTIFIER_SITE,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, bucode, buname, identifier, parent_id, enable, created_at, updated_at";

/// Provides lookups over clients and sites.
pub struct BusinessUnitRepo;

impl BusinessUnitRepo {
    /// Insert a new client or site, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBusinessUnit,
    ) -> Result<BusinessUnit, sqlx::Error> {
        let query = format!(
            "INSERT INTO business_units (bucode, buname, identifier, parent_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BusinessUnit>(&query)
            .bind(&input.bucode)
            .bind(&input.buname)
            .bind(&input.identifier)
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Id of the enabled client with this code (case-insensitive).
    pub async fn find_client_id(pool: &PgPool, code: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM business_units
             WHERE identifier = $1 AND upper(bucode) = upper($2) AND enable = true",
        )
        .bind(BU_IDENTIFIER_CLIENT)
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Id of the enabled site with this code under a client (case-insensitive).
    pub async fn find_site_id(
        pool: &PgPool,
        client_id: DbId,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM business_units
             WHERE identifier = $1 AND parent_id = $2
               AND upper(bucode) = upper($3) AND enable = true",
        )
        .bind(BU_IDENTIFIER_SITE)
        .bind(client_id)
        .bind(code)
        .fetch_optional(pool)
        .await
    }
}
