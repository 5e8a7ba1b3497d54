//! Helpers for the optional text fields coming from forms and JSON bodies.

use crate::domain::errors::{DomainError, DomainResult};

/// Trimmed value of a required field; blank counts as missing.
pub fn required(value: Option<String>, field: &str) -> DomainResult<String> {
    provided(value).ok_or_else(|| DomainError::validation(format!("{} is required", field)))
}

/// Trimmed value when present and not blank.
pub fn provided(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ensure an entity loaded for `user_id` actually belongs to them.
pub fn ensure_owner(owner_id: &str, user_id: &str, what: &str) -> DomainResult<()> {
    if owner_id == user_id {
        Ok(())
    } else {
        Err(DomainError::Forbidden(format!("Not allowed to access this {}", what)))
    }
}
