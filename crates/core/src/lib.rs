//! Domain logic for the facility bulk-import service.
//!
//! Nothing in this crate touches the database or the network. Lookups that
//! need storage go through [`import::resolve::ReferenceResolver`], which the
//! `db` crate implements.

pub mod error;
pub mod import;
pub mod import_status;
pub mod rate_limit;
pub mod roles;
pub mod scheduling;
pub mod types;
pub mod validation;
