//! Scalar validators and validation failures
//!
//! Independent, composable checks used by the formatter:
//! - required-ness
//! - numeric min/max, compared at fixed decimal precision
//! - enumerated options, strict equality
//! - string length limit
//! - disallowed characters, reject or strip

mod errors;
mod rules;

pub use errors::{ValidationError, ValidationErrorKind, ValidationResult};
pub use rules::{
    check_characters, check_limit, check_max, check_min, check_options, check_required,
    find_disallowed, is_empty, strip_disallowed, to_decimal,
};
