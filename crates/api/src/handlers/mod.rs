//! Request handlers.
//!
//! Each submodule holds the async handlers for one route group. Handlers
//! delegate to `facility_core` for domain logic and to the repositories in
//! `facility_db` for storage, mapping failures via [`AppError`].

pub mod auth;
pub mod imports;
pub mod scheduler;
pub mod type_assists;

use facility_core::error::CoreError;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run `validator` derive rules on a request body.
pub(crate) fn validate_body<T: Validate>(body: &T) -> AppResult<()> {
    body.validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))
}
