pub mod company;
pub mod list;
pub mod note;
pub mod saved_search;

use crate::errors::AppError;

/// Pulls a mandatory string field out of a request body, rejecting missing
/// or blank values with a 400 naming the field.
pub(crate) fn require(field: &str, value: Option<String>) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(format!("{field} is required"))),
    }
}
