//! Schema definitions for parameter formatting
//!
//! A schema maps field names to nodes describing the expected type, the type
//! the value is sent as, and the constraints checked while formatting.
//!
//! # Design Principles
//!
//! - Declaration order decides which failure is reported first
//! - `variables` present iff the node is an `array` or `object`
//! - Schemas are never mutated by the formatter

mod errors;
mod loader;
mod types;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::{schema_file_name, SchemaLoader};
pub use types::{CharacterMode, Disallowed, FieldType, Schema, SchemaFields, SchemaNode};
