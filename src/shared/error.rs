//! Shared Error Types
//!
//! Field-level validation errors returned to clients by the account
//! endpoints. These are serialized as-is inside the `errors` array of a
//! `400` response.
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single field that failed validation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Error)]
#[error("Validation error in field '{field}': {message}")]
pub struct FieldError {
    /// The field that failed validation
    pub field: String,
    /// Human-readable (Spanish) error message
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field errors while validating a request
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &str, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Finish validation, returning every collected error
    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}
