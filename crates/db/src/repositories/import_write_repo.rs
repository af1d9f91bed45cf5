//! Commit path for validated imports.
//!
//! Every accepted entry of a preview report is written inside one
//! transaction together with the report's status change. Any failure rolls
//! back the whole batch, leaving the report in `preview`.

use facility_core::import::resource::ResourceKind;
use facility_core::import_status::IMPORT_STATUS_PREVIEW;
use facility_core::types::DbId;
use facility_core::validation::import_preview::ImportAction;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::asset::{CreateAsset, UpdateAsset};
use crate::models::import_report::ImportReportEntry;
use crate::models::job::{CreateJob, UpdateJob};
use crate::models::location::{CreateLocation, UpdateLocation};
use crate::models::vendor::{CreateVendor, UpdateVendor};
use crate::repositories::{AssetRepo, ImportReportRepo, JobRepo, LocationRepo, VendorRepo};

/// Rows written by a commit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CommitSummary {
    pub created: usize,
    pub updated: usize,
}

/// Writes import payloads to their entity tables.
pub struct ImportWriteRepo;

impl ImportWriteRepo {
    /// Apply every create/update entry of a report and move it from
    /// `preview` to `final_status`.
    ///
    /// Returns `None` when the report is no longer in `preview` (already
    /// committed, or a concurrent commit won).
    pub async fn apply(
        pool: &PgPool,
        report_id: DbId,
        resource: ResourceKind,
        entries: &[ImportReportEntry],
        actor: Option<DbId>,
        final_status: &str,
    ) -> Result<Option<CommitSummary>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let moved = ImportReportRepo::transition_status(
            &mut tx,
            report_id,
            IMPORT_STATUS_PREVIEW,
            final_status,
            actor,
        )
        .await?;
        if !moved {
            tx.rollback().await?;
            return Ok(None);
        }

        let mut summary = CommitSummary::default();
        for entry in entries {
            let Some(action) = ImportAction::parse(&entry.action) else {
                continue;
            };
            let Some(payload) = entry.payload.as_ref() else {
                continue;
            };
            match action {
                ImportAction::Create => {
                    let id = Self::create(&mut tx, resource, payload, actor).await?;
                    ImportReportRepo::set_entry_entity(&mut tx, entry.id, id).await?;
                    summary.created += 1;
                }
                ImportAction::Update => {
                    let id = entry.entity_id.ok_or(sqlx::Error::RowNotFound)?;
                    Self::update(&mut tx, resource, id, payload, actor).await?;
                    summary.updated += 1;
                }
                ImportAction::Skip | ImportAction::Reject => {}
            }
        }

        tx.commit().await?;
        tracing::info!(
            report_id,
            resource = %resource,
            created = summary.created,
            updated = summary.updated,
            "Import committed",
        );
        Ok(Some(summary))
    }

    async fn create(
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceKind,
        payload: &serde_json::Value,
        actor: Option<DbId>,
    ) -> Result<DbId, sqlx::Error> {
        let id = match resource {
            ResourceKind::Asset => {
                AssetRepo::create(tx, &decode::<CreateAsset>(payload)?, actor)
                    .await?
                    .id
            }
            ResourceKind::Location => {
                LocationRepo::create(tx, &decode::<CreateLocation>(payload)?, actor)
                    .await?
                    .id
            }
            ResourceKind::Task | ResourceKind::Tour => {
                JobRepo::create(tx, &decode::<CreateJob>(payload)?, actor)
                    .await?
                    .id
            }
            ResourceKind::Vendor => {
                VendorRepo::create(tx, &decode::<CreateVendor>(payload)?, actor)
                    .await?
                    .id
            }
        };
        Ok(id)
    }

    async fn update(
        tx: &mut Transaction<'_, Postgres>,
        resource: ResourceKind,
        id: DbId,
        payload: &serde_json::Value,
        actor: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        let found = match resource {
            ResourceKind::Asset => {
                AssetRepo::update(tx, id, &decode::<UpdateAsset>(payload)?, actor)
                    .await?
                    .is_some()
            }
            ResourceKind::Location => {
                LocationRepo::update(tx, id, &decode::<UpdateLocation>(payload)?, actor)
                    .await?
                    .is_some()
            }
            ResourceKind::Task | ResourceKind::Tour => {
                JobRepo::update(tx, id, &decode::<UpdateJob>(payload)?, actor)
                    .await?
                    .is_some()
            }
            ResourceKind::Vendor => {
                VendorRepo::update(tx, id, &decode::<UpdateVendor>(payload)?, actor)
                    .await?
                    .is_some()
            }
        };
        if found {
            Ok(())
        } else {
            Err(sqlx::Error::RowNotFound)
        }
    }
}

/// Deserialize a stored payload into a write DTO.
fn decode<T: DeserializeOwned>(payload: &serde_json::Value) -> Result<T, sqlx::Error> {
    T::deserialize(payload).map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
