//! Unified error type for the domain layer
//!
//! Adapters and the engine map these into their own error enums; nothing in
//! this crate panics on bad input.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A content-table row or record field is missing
    #[error("Not found: {kind} '{name}'")]
    NotFound { kind: &'static str, name: String },

    /// Business rule violation (caps, floors, slot limits)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Parse error (for value objects and save records)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_error_display() {
        let err = DomainError::constraint("training cap reached");
        assert_eq!(
            err.to_string(),
            "Constraint violation: training cap reached"
        );
    }

    #[test]
    fn test_not_found_error_display() {
        let err = DomainError::not_found("monster", "Gelatinous Duke");
        assert!(err.to_string().contains("monster"));
        assert!(err.to_string().contains("Gelatinous Duke"));
    }

    #[test]
    fn test_from_dice_parse_error() {
        let err: DomainError = DiceParseError::Empty.into();
        assert!(matches!(err, DomainError::Parse(_)));
    }
}
