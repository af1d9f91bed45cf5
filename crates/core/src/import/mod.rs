//! Row-level bulk import pipeline.
//!
//! Every resource runs the same stages:
//!
//! 1. [`clean`] normalises headers and cell text.
//! 2. [`fields`] parses cells against the resource's [`columns`] template and
//!    runs cross-field checks.
//! 3. [`defaults`] injects static and conditional defaults (create mode).
//! 4. [`resolve`] turns client, site, type-assist and entity codes into ids,
//!    scoped by tenant.
//! 5. [`pipeline`] applies in-file and database uniqueness and decides the
//!    action for each row.

pub mod clean;
pub mod columns;
pub mod defaults;
pub mod fields;
pub mod pipeline;
pub mod resolve;
pub mod resource;

/// One spreadsheet row as submitted: header → cell.
pub type RawRow = serde_json::Map<String, serde_json::Value>;
