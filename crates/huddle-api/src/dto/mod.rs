//! Request and response DTOs.

pub mod request;
pub mod response;

use validator::Validate;

use huddle_core::error::AppError;
use huddle_core::result::AppResult;

/// Run validator-derived checks and map failures to a validation error.
pub fn validate<T: Validate>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))
}
