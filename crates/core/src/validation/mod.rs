//! Row validation results, conflict detection and import preview types.
//!
//! These are the shapes the import pipeline produces and the API persists;
//! none of them depend on the database.

pub mod conflict;
pub mod import_preview;
pub mod rules;
