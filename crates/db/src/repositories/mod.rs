//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! `&PgPool` (or an open transaction, for the import write path) as the first
//! argument.

pub mod asset_repo;
pub mod business_unit_repo;
pub mod import_report_repo;
pub mod import_write_repo;
pub mod job_repo;
pub mod location_repo;
pub mod people_repo;
pub mod rate_limit_repo;
pub mod type_assist_repo;
pub mod vendor_repo;

pub use asset_repo::AssetRepo;
pub use business_unit_repo::BusinessUnitRepo;
pub use import_report_repo::ImportReportRepo;
pub use import_write_repo::ImportWriteRepo;
pub use job_repo::JobRepo;
pub use location_repo::LocationRepo;
pub use people_repo::PeopleRepo;
pub use rate_limit_repo::RateLimitRepo;
pub use type_assist_repo::TypeAssistRepo;
pub use vendor_repo::VendorRepo;
