//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity can be updated by an import

pub mod asset;
pub mod business_unit;
pub mod import_report;
pub mod job;
pub mod location;
pub mod people;
pub mod rate_limit;
pub mod type_assist;
pub mod vendor;
