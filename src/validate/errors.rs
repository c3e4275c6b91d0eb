//! Validation failure types
//!
//! Every failure carries the field path, the failure kind and a
//! human-readable message. Failures are deterministic and never retryable.

use std::fmt;

use thiserror::Error;

/// Kinds of validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// Required field is null, empty, or absent
    MissingRequiredValue,
    /// Value is non-numeric or outside min/max
    OutOfRange,
    /// Value is not one of the allowed options
    InvalidOption,
    /// String value is longer than the limit
    LengthExceeded,
    /// String value contains disallowed characters
    DisallowedCharacters,
}

impl ValidationErrorKind {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingRequiredValue => "MISSING_REQUIRED_VALUE",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::InvalidOption => "INVALID_OPTION",
            Self::LengthExceeded => "LENGTH_EXCEEDED",
            Self::DisallowedCharacters => "DISALLOWED_CHARACTERS",
        }
    }
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A single validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    field: String,
    kind: ValidationErrorKind,
    message: String,
    /// Disallowed substrings found, only for `DisallowedCharacters`
    matches: Vec<String>,
}

impl ValidationError {
    pub fn new(
        field: impl Into<String>,
        kind: ValidationErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
            matches: Vec::new(),
        }
    }

    pub fn missing_required(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::MissingRequiredValue,
            format!("A value is required for parameter {}.", field),
        )
    }

    pub fn below_min(field: &str, min: impl fmt::Display) -> Self {
        Self::new(
            field,
            ValidationErrorKind::OutOfRange,
            format!("Parameter {} must be at least {}.", field, min),
        )
    }

    pub fn above_max(field: &str, max: impl fmt::Display) -> Self {
        Self::new(
            field,
            ValidationErrorKind::OutOfRange,
            format!("Parameter {} must be at most {}.", field, max),
        )
    }

    pub fn not_numeric(field: &str) -> Self {
        Self::new(
            field,
            ValidationErrorKind::OutOfRange,
            format!("Parameter {} must be numeric.", field),
        )
    }

    pub fn invalid_option(field: &str, allowed: &[String]) -> Self {
        Self::new(
            field,
            ValidationErrorKind::InvalidOption,
            format!("Allowed values for parameter {} are [{}].", field, allowed.join("|")),
        )
    }

    pub fn length_exceeded(field: &str, limit: usize) -> Self {
        Self::new(
            field,
            ValidationErrorKind::LengthExceeded,
            format!("Parameter {} has a limit of {} characters.", field, limit),
        )
    }

    pub fn disallowed_characters(field: &str, matches: Vec<String>) -> Self {
        let mut err = Self::new(
            field,
            ValidationErrorKind::DisallowedCharacters,
            format!(
                "Parameter {} contains disallowed characters ({}).",
                field,
                matches.join(",")
            ),
        );
        err.matches = matches;
        err
    }

    /// Field path, e.g. `cart.items[0].quantity`
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn kind(&self) -> ValidationErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Disallowed substrings that were found
    pub fn matches(&self) -> &[String] {
        &self.matches
    }
}

/// Result type for validation and formatting
pub type ValidationResult<T> = Result<T, ValidationError>;
