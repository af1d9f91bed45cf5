//! Repository for the `people` table.

use facility_core::types::DbId;
use sqlx::PgPool;

use crate::models::people::{CreatePeople, People};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, peoplecode, peoplename, loginid, email, password_hash, is_admin, \
                        enable, client_id, bu_id, created_at, updated_at";

/// Provides access to people.
pub struct PeopleRepo;

impl PeopleRepo {
    /// Insert a new person, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePeople) -> Result<People, sqlx::Error> {
        let query = format!(
            "INSERT INTO people
                (peoplecode, peoplename, loginid, email, password_hash, is_admin, client_id, bu_id)
             VALUES (upper($1), $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, People>(&query)
            .bind(&input.peoplecode)
            .bind(&input.peoplename)
            .bind(&input.loginid)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.is_admin)
            .bind(input.client_id)
            .bind(input.bu_id)
            .fetch_one(pool)
            .await
    }

    /// Find a person by login id (case-sensitive).
    pub async fn find_by_loginid(pool: &PgPool, loginid: &str) -> Result<Option<People>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM people WHERE loginid = $1");
        sqlx::query_as::<_, People>(&query)
            .bind(loginid)
            .fetch_optional(pool)
            .await
    }

    /// Id of the enabled person with this code within a client.
    pub async fn find_id_by_code(
        pool: &PgPool,
        client_id: DbId,
        code: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM people
             WHERE client_id = $1 AND upper(peoplecode) = upper($2) AND enable = true",
        )
        .bind(client_id)
        .bind(code)
        .fetch_optional(pool)
        .await
    }
}
