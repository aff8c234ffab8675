//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization with camelCase
//! keys, and validator for input validation.

pub mod account;
pub mod filter;
pub mod health;
pub mod resident;

use validator::ValidationError;

/// Rejects strings made only of whitespace.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }

    Ok(())
}
