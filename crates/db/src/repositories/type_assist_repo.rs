//! Repository for the `type_assists` table.

use facility_core::types::DbId;
use sqlx::PgPool;

use crate::models::type_assist::{CreateTypeAssist, TypeAssist};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, tacode, taname, tatype, client_id, enable, created_at, updated_at";

/// Provides access to per-client lookup codes.
pub struct TypeAssistRepo;

impl TypeAssistRepo {
    /// Insert a new type-assist code. The code is stored uppercase.
    pub async fn create(pool: &PgPool, input: &CreateTypeAssist) -> Result<TypeAssist, sqlx::Error> {
        let query = format!(
            "INSERT INTO type_assists (tacode, taname, tatype, client_id)
             VALUES (upper($1), $2, upper($3), $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TypeAssist>(&query)
            .bind(&input.tacode)
            .bind(&input.taname)
            .bind(&input.tatype)
            .bind(input.client_id)
            .fetch_one(pool)
            .await
    }

    /// List the enabled codes of a client, optionally restricted to one category.
    pub async fn list(
        pool: &PgPool,
        client_id: DbId,
        tatype: Option<&str>,
    ) -> Result<Vec<TypeAssist>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM type_assists
             WHERE client_id = $1 AND enable = true
               AND ($2::TEXT IS NULL OR tatype = upper($2))
             ORDER BY tatype, tacode"
        );
        sqlx::query_as::<_, TypeAssist>(&query)
            .bind(client_id)
            .bind(tatype)
            .fetch_all(pool)
            .await
    }

    /// Id of an enabled code in a category, scoped to the client.
    pub async fn find_id(
        pool: &PgPool,
        client_id: DbId,
        tatype: &str,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM type_assists
             WHERE client_id = $1 AND tatype = $2
               AND upper(tacode) = upper($3) AND enable = true",
        )
        .bind(client_id)
        .bind(tatype)
        .bind(code)
        .fetch_optional(pool)
        .await
    }
}
