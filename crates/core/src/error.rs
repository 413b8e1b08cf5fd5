//! Validation error model.

use thiserror::Error;

/// Result type used by constructors of validated values.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A value failed validation before reaching any collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An email address was empty or malformed.
    #[error("invalid email: {0}")]
    InvalidEmail(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A free-form field would shadow a field the record owns itself.
    #[error("reserved field name: {0}")]
    ReservedField(String),
}

impl ValidationError {
    pub fn invalid_email(msg: impl Into<String>) -> Self {
        Self::InvalidEmail(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn reserved_field(name: impl Into<String>) -> Self {
        Self::ReservedField(name.into())
    }
}
