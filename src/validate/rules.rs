//! Scalar validators
//!
//! Each check takes the field path, the value and the schema node, and either
//! passes or returns the matching [`ValidationError`]. Checks whose constraint
//! is not configured on the node always pass.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use super::errors::{ValidationError, ValidationResult};
use crate::schema::{CharacterMode, SchemaNode};

/// Precision used for bounds comparisons
const COMPARE_DP: u32 = 2;

/// Null, empty string, empty list and empty record are empty. `0` and `false`
/// are not.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Exact decimal view of a number or numeric string.
///
/// Returns `None` for anything else, including values outside the decimal range.
pub fn to_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                Some(Decimal::from(u))
            } else {
                // Shortest round-trip text, so 0.1 stays 0.1
                parse_decimal(&n.to_string())
            }
        }
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

fn at_compare_precision(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(COMPARE_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Fails when the node is required and the value is empty.
pub fn check_required(field: &str, value: &Value, node: &SchemaNode) -> ValidationResult<()> {
    if node.required && is_empty(value) {
        return Err(ValidationError::missing_required(field));
    }
    Ok(())
}

/// Fails when the value is below a well-formed `min`.
pub fn check_min(field: &str, value: &Value, node: &SchemaNode) -> ValidationResult<()> {
    let Some(min) = node.min.as_ref().and_then(to_decimal) else {
        return Ok(());
    };
    let actual = to_decimal(value).ok_or_else(|| ValidationError::not_numeric(field))?;
    if at_compare_precision(actual) < at_compare_precision(min) {
        return Err(ValidationError::below_min(field, min.normalize()));
    }
    Ok(())
}

/// Fails when the value is above a well-formed `max`.
pub fn check_max(field: &str, value: &Value, node: &SchemaNode) -> ValidationResult<()> {
    let Some(max) = node.max.as_ref().and_then(to_decimal) else {
        return Ok(());
    };
    let actual = to_decimal(value).ok_or_else(|| ValidationError::not_numeric(field))?;
    if at_compare_precision(actual) > at_compare_precision(max) {
        return Err(ValidationError::above_max(field, max.normalize()));
    }
    Ok(())
}

/// Fails when a non-empty value is not strictly equal to one of `options`.
pub fn check_options(field: &str, value: &Value, node: &SchemaNode) -> ValidationResult<()> {
    if node.options.is_empty() || is_empty(value) {
        return Ok(());
    }
    if node.options.iter().any(|option| option == value) {
        return Ok(());
    }
    let allowed: Vec<String> = node.options.iter().map(display_option).collect();
    Err(ValidationError::invalid_option(field, &allowed))
}

fn display_option(option: &Value) -> String {
    match option {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Fails when the string is longer than `limit` characters.
pub fn check_limit(field: &str, value: &str, node: &SchemaNode) -> ValidationResult<()> {
    match node.limit {
        Some(limit) if value.chars().count() > limit => {
            Err(ValidationError::length_exceeded(field, limit))
        }
        _ => Ok(()),
    }
}

/// Disallowed substrings present in `value`, in declaration order.
pub fn find_disallowed(value: &str, chars: &[String]) -> Vec<String> {
    chars
        .iter()
        .filter(|c| !c.is_empty() && value.contains(c.as_str()))
        .cloned()
        .collect()
}

/// Removes every occurrence of every disallowed substring.
pub fn strip_disallowed(value: &str, chars: &[String]) -> String {
    chars
        .iter()
        .filter(|c| !c.is_empty())
        .fold(value.to_string(), |acc, c| acc.replace(c.as_str(), ""))
}

/// Applies the node's disallowed characters in the given mode.
///
/// Reject mode returns the value unchanged or fails listing every match.
/// Strip mode never fails.
pub fn check_characters(
    field: &str,
    value: &str,
    node: &SchemaNode,
    mode: CharacterMode,
) -> ValidationResult<String> {
    let Some(replace) = node.replace.as_ref() else {
        return Ok(value.to_string());
    };
    match mode {
        CharacterMode::Reject => {
            let matches = find_disallowed(value, &replace.chars);
            if matches.is_empty() {
                Ok(value.to_string())
            } else {
                Err(ValidationError::disallowed_characters(field, matches))
            }
        }
        CharacterMode::Strip => Ok(strip_disallowed(value, &replace.chars)),
    }
}
