//! PostgreSQL implementation of the import pipeline's reference resolver.

use std::collections::HashMap;

use async_trait::async_trait;
use facility_core::error::CoreError;
use facility_core::import::resolve::{ExistingRecord, Lookup, NaturalKey, ReferenceResolver};
use facility_core::import::resource::ResourceKind;
use facility_core::types::DbId;
use serde::Serialize;
use sqlx::PgPool;

use crate::repositories::{
    AssetRepo, BusinessUnitRepo, JobRepo, LocationRepo, PeopleRepo, TypeAssistRepo, VendorRepo,
};

/// Resolves codes against committed rows, memoising every lookup (hits and
/// misses) for the lifetime of one import run.
pub struct PgReferenceResolver {
    pool: PgPool,
    cache: HashMap<Lookup, Option<DbId>>,
}

impl PgReferenceResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: HashMap::new(),
        }
    }

    /// Number of distinct lookups answered so far.
    pub fn cached_lookups(&self) -> usize {
        self.cache.len()
    }

    async fn query(&self, lookup: &Lookup) -> Result<Option<DbId>, sqlx::Error> {
        let pool = &self.pool;
        match lookup {
            Lookup::Client { code } => BusinessUnitRepo::find_client_id(pool, code).await,
            Lookup::Site { client_id, code } => {
                BusinessUnitRepo::find_site_id(pool, *client_id, code).await
            }
            Lookup::TypeAssist {
                client_id,
                tatype,
                code,
            } => TypeAssistRepo::find_id(pool, *client_id, tatype, code).await,
            Lookup::People { client_id, code } => {
                PeopleRepo::find_id_by_code(pool, *client_id, code).await
            }
            Lookup::Asset {
                client_id,
                bu_id,
                code,
            } => AssetRepo::find_id_by_code(pool, *client_id, *bu_id, code).await,
            Lookup::Location {
                client_id,
                bu_id,
                code,
            } => LocationRepo::find_id_by_code(pool, *client_id, *bu_id, code).await,
        }
    }

    async fn existing(
        &self,
        resource: ResourceKind,
        key: &NaturalKey,
    ) -> Result<Option<ExistingRecord>, CoreError> {
        let pool = &self.pool;
        let client_id = key.client_id;

        // Site-scoped resources cannot exist without a site.
        let site = key.bu_id;
        let record = match (resource, site) {
            (ResourceKind::Asset, Some(bu_id)) => {
                to_record(AssetRepo::find_by_code(pool, client_id, bu_id, &key.key).await)?
            }
            (ResourceKind::Location, Some(bu_id)) => {
                to_record(LocationRepo::find_by_code(pool, client_id, bu_id, &key.key).await)?
            }
            (ResourceKind::Task, Some(bu_id)) => {
                to_record(JobRepo::find_task_by_name(pool, client_id, bu_id, &key.key).await)?
            }
            (ResourceKind::Tour, Some(bu_id)) => {
                to_record(JobRepo::find_tour_by_name(pool, client_id, bu_id, &key.key).await)?
            }
            (ResourceKind::Vendor, _) => {
                to_record(VendorRepo::find_by_code(pool, client_id, &key.key).await)?
            }
            (_, None) => None,
        };
        Ok(record)
    }
}

/// Serialize a fetched row into the payload-keyed shape the diff expects.
fn to_record<T: Serialize>(
    row: Result<Option<T>, sqlx::Error>,
) -> Result<Option<ExistingRecord>, CoreError> {
    let Some(row) = row.map_err(db_error)? else {
        return Ok(None);
    };
    let fields = match serde_json::to_value(&row) {
        Ok(serde_json::Value::Object(map)) => map,
        Ok(_) => serde_json::Map::new(),
        Err(e) => return Err(CoreError::Internal(e.to_string())),
    };
    let id = fields
        .get("id")
        .and_then(serde_json::Value::as_i64)
        .ok_or_else(|| CoreError::Internal("Stored row has no id".to_string()))?;
    Ok(Some(ExistingRecord { id, fields }))
}

fn db_error(e: sqlx::Error) -> CoreError {
    tracing::error!(error = %e, "Reference lookup failed");
    CoreError::Internal("Reference lookup failed".to_string())
}

#[async_trait]
impl ReferenceResolver for PgReferenceResolver {
    async fn lookup(&mut self, lookup: &Lookup) -> Result<Option<DbId>, CoreError> {
        if let Some(hit) = self.cache.get(lookup) {
            return Ok(*hit);
        }
        let id = self.query(lookup).await.map_err(db_error)?;
        if id.is_none() {
            tracing::debug!(entity = lookup.entity(), code = lookup.code(), "Lookup miss");
        }
        self.cache.insert(lookup.clone(), id);
        Ok(id)
    }

    async fn find_existing(
        &mut self,
        resource: ResourceKind,
        key: &NaturalKey,
    ) -> Result<Option<ExistingRecord>, CoreError> {
        self.existing(resource, key).await
    }
}
