//! Type coercion between canonical types
//!
//! Coercion never fails: any input is force-converted. Non-numeric strings
//! become zero, and truthiness follows the usual scalar rules (`""`, `"0"`,
//! `0`, `0.0`, null and empty containers are false).

use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Number, Value};

use super::config::{FormatConfig, MAX_PRECISION};
use crate::schema::FieldType;

/// Casts `value` to `target`.
///
/// `decimals` overrides the configured precision when a float is cast to a
/// string.
pub fn cast_to(value: &Value, target: FieldType, decimals: Option<u32>, config: &FormatConfig) -> Value {
    match target {
        FieldType::Float => float_value(to_float(value, config)),
        FieldType::Int => Value::from(to_int(value, config)),
        FieldType::Bool => Value::Bool(to_bool(value)),
        FieldType::Array => Value::Array(to_array(value)),
        FieldType::Object => Value::Object(to_object(value)),
        FieldType::String => Value::String(to_text(value, decimals, config)),
    }
}

fn float_value(f: f64) -> Value {
    Number::from_f64(f)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(0.0))
}

/// Float view of any value. Strings are read with the configured separators.
pub fn to_float(value: &Value, config: &FormatConfig) -> f64 {
    let f = match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => numeric_prefix(&delocalize(s, config))
            .parse::<f64>()
            .unwrap_or(0.0),
        Value::Array(items) => f64::from(u8::from(!items.is_empty())),
        Value::Object(_) => 1.0,
    };
    if f.is_finite() {
        f
    } else {
        0.0
    }
}

/// Integer view of any value, truncating toward zero and saturating
pub fn to_int(value: &Value, config: &FormatConfig) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().map(|_| i64::MAX))
            .unwrap_or_else(|| truncate_float(n.as_f64().unwrap_or(0.0))),
        Value::String(s) => {
            let text = delocalize(s, config);
            let prefix = numeric_prefix(&text);
            prefix
                .parse::<i64>()
                .unwrap_or_else(|_| truncate_float(prefix.parse::<f64>().unwrap_or(0.0)))
        }
        other => truncate_float(to_float(other, config)),
    }
}

fn truncate_float(f: f64) -> i64 {
    // `as` saturates and maps NaN to 0
    f.trunc() as i64
}

/// Truthiness of any value
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Wraps a value into a list. Null becomes an empty list.
pub fn to_array(value: &Value) -> Vec<Value> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Wraps a value into a record. Lists are keyed by index, scalars are stored
/// under `scalar`.
pub fn to_object(value: &Value) -> Map<String, Value> {
    match value {
        Value::Null => Map::new(),
        Value::Object(map) => map.clone(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        other => {
            let mut map = Map::new();
            map.insert("scalar".to_string(), other.clone());
            map
        }
    }
}

/// String view of any value. Floats are formatted with `decimals` or the
/// configured precision.
pub fn to_text(value: &Value, decimals: Option<u32>, config: &FormatConfig) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) if n.is_f64() => format_number(
            n.as_f64().unwrap_or(0.0),
            decimals.unwrap_or(config.precision),
            config,
        ),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Formats a float with fixed decimals, rounding half away from zero, using
/// the configured separators.
pub fn format_number(value: f64, decimals: u32, config: &FormatConfig) -> String {
    let decimals = decimals.min(MAX_PRECISION);
    let plain = match Decimal::from_str(&value.to_string()) {
        Ok(d) => {
            let mut rounded = d.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(decimals);
            rounded.to_string()
        }
        // Outside the decimal range
        Err(_) => format!("{:.*}", decimals as usize, value),
    };

    let (negative, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, plain.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };

    let mut out = String::with_capacity(plain.len() + 4);
    // No "-0.00"
    if negative && unsigned.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, &config.thousands_separator));
    if !frac_part.is_empty() {
        out.push_str(&config.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_thousands(digits: &str, separator: &str) -> String {
    if separator.is_empty() || digits.len() <= 3 || !digits.is_ascii() {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(c);
    }
    out
}

/// Rewrites a number written with the configured separators into plain
/// `1234.5` form, so formatted output reads back as the same number.
pub fn delocalize<'a>(s: &'a str, config: &FormatConfig) -> Cow<'a, str> {
    let thousands = config.thousands_separator.as_str();
    let decimal = config.decimal_separator.as_str();
    if thousands.is_empty() && decimal == "." {
        return Cow::Borrowed(s);
    }

    let mut out = if thousands.is_empty() {
        s.to_string()
    } else {
        s.replace(thousands, "")
    };
    if decimal != "." {
        out = out.replace(decimal, ".");
    }
    Cow::Owned(out)
}

/// Longest leading part of `s` that reads as a number, ignoring leading
/// whitespace. Empty when there is none.
fn numeric_prefix(s: &str) -> &str {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return "";
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &s[..end]
}

/// Trims and cuts a value's text to at most `limit` characters.
pub fn truncate(value: &Value, limit: usize, config: &FormatConfig) -> String {
    to_text(value, None, config)
        .trim()
        .chars()
        .take(limit)
        .collect()
}
