//! Schema error types
//!
//! Error codes:
//! - PF_UNKNOWN_SCHEMA
//! - PF_UNKNOWN_SCHEMA_VERSION
//! - PF_MALFORMED_SCHEMA
//! - PF_SCHEMA_IMMUTABLE

use thiserror::Error;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema ID not found
    UnknownSchema,
    /// Schema version not found
    UnknownSchemaVersion,
    /// Schema file unreadable or structurally invalid
    MalformedSchema,
    /// Attempt to replace a registered schema
    SchemaImmutable,
}

impl SchemaErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::UnknownSchema => "PF_UNKNOWN_SCHEMA",
            SchemaErrorCode::UnknownSchemaVersion => "PF_UNKNOWN_SCHEMA_VERSION",
            SchemaErrorCode::MalformedSchema => "PF_MALFORMED_SCHEMA",
            SchemaErrorCode::SchemaImmutable => "PF_SCHEMA_IMMUTABLE",
        }
    }
}

/// Errors raised while loading or registering schemas
#[derive(Debug, Clone, Error)]
pub enum SchemaError {
    #[error("Schema '{0}' not found")]
    UnknownSchema(String),

    #[error("Schema '{schema_id}' version '{version}' not found")]
    UnknownVersion { schema_id: String, version: String },

    #[error("Malformed schema '{source_name}': {reason}")]
    Malformed { source_name: String, reason: String },

    #[error("Schema '{schema_id}' version '{version}' is immutable")]
    Immutable { schema_id: String, version: String },
}

impl SchemaError {
    pub fn unknown_version(schema_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::UnknownVersion {
            schema_id: schema_id.into(),
            version: version.into(),
        }
    }

    /// Schema file or in-memory definition could not be used
    pub fn malformed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn immutable(schema_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self::Immutable {
            schema_id: schema_id.into(),
            version: version.into(),
        }
    }

    pub fn code(&self) -> SchemaErrorCode {
        match self {
            SchemaError::UnknownSchema(_) => SchemaErrorCode::UnknownSchema,
            SchemaError::UnknownVersion { .. } => SchemaErrorCode::UnknownSchemaVersion,
            SchemaError::Malformed { .. } => SchemaErrorCode::MalformedSchema,
            SchemaError::Immutable { .. } => SchemaErrorCode::SchemaImmutable,
        }
    }
}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            SchemaError::UnknownSchema("x".into()).code().code(),
            "PF_UNKNOWN_SCHEMA"
        );
        assert_eq!(
            SchemaError::unknown_version("x", "v2").code().code(),
            "PF_UNKNOWN_SCHEMA_VERSION"
        );
        assert_eq!(
            SchemaError::malformed("a.json", "bad").code().code(),
            "PF_MALFORMED_SCHEMA"
        );
        assert_eq!(
            SchemaError::immutable("x", "v1").code().code(),
            "PF_SCHEMA_IMMUTABLE"
        );
    }

    #[test]
    fn test_display_mentions_source() {
        let err = SchemaError::malformed("schema_users_v1.json", "Invalid JSON");
        let display = err.to_string();
        assert!(display.contains("schema_users_v1.json"));
        assert!(display.contains("Invalid JSON"));
    }
}
