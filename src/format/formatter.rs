//! Recursive schema-driven formatter
//!
//! Walks a schema and a raw value tree together:
//! - scalar nodes are trimmed, checked, cast and checked again
//! - `array` nodes format every record in the list
//! - `object` nodes format their record in place
//!
//! Fields are visited in schema declaration order and the first failure aborts
//! the whole walk. Fields whose formatted value is empty are dropped.

use serde_json::{Map, Value};

use super::coerce;
use super::config::{ConfigError, FormatConfig};
use crate::schema::{CharacterMode, FieldType, Schema, SchemaFields, SchemaNode};
use crate::validate::{self, ValidationError, ValidationResult};

/// How disallowed characters are treated for this walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Each node's own mode, reject unless the node says strip
    Strict,
    /// Always strip
    Sanitize,
}

impl Pass {
    fn character_mode(self, node: &SchemaNode) -> CharacterMode {
        match self {
            Pass::Strict => node
                .replace
                .as_ref()
                .map_or(CharacterMode::Reject, |r| r.mode),
            Pass::Sanitize => CharacterMode::Strip,
        }
    }
}

/// What happens to record keys without a schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UnknownKeys {
    Drop,
    PassThrough,
}

/// Formats value trees against schemas.
///
/// Holds the number formatting configuration; construct once and share.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    config: FormatConfig,
}

impl Formatter {
    /// Creates a formatter after validating the configuration.
    pub fn new(config: FormatConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    /// Casts a value using this formatter's number configuration.
    pub fn cast_to(&self, value: &Value, target: FieldType, decimals: Option<u32>) -> Value {
        coerce::cast_to(value, target, decimals, &self.config)
    }

    /// Formats a single field, rejecting disallowed characters unless the node
    /// asks for stripping.
    pub fn format_field(&self, name: &str, value: &Value, node: &SchemaNode) -> ValidationResult<Value> {
        self.format_value(name, value, node, Pass::Strict)
            .inspect_err(log_failure)
    }

    /// Formats a single field, stripping disallowed characters.
    pub fn sanitize_field(&self, name: &str, value: &Value, node: &SchemaNode) -> ValidationResult<Value> {
        self.format_value(name, value, node, Pass::Sanitize)
            .inspect_err(log_failure)
    }

    /// Formats a full record against top-level fields.
    ///
    /// Keys without a schema entry and fields formatting to an empty value are
    /// left out. A non-record input is treated as an empty record.
    pub fn format(&self, fields: &SchemaFields, record: &Value) -> ValidationResult<Value> {
        self.format_root(fields, record, Pass::Strict)
    }

    /// Like [`Formatter::format`], but disallowed characters are stripped
    /// instead of rejected.
    pub fn sanitize(&self, fields: &SchemaFields, record: &Value) -> ValidationResult<Value> {
        self.format_root(fields, record, Pass::Sanitize)
    }

    /// Checks a record without keeping the output.
    pub fn validate(&self, fields: &SchemaFields, record: &Value) -> ValidationResult<()> {
        self.format(fields, record).map(|_| ())
    }

    /// Formats a record against a schema's fields.
    pub fn format_schema(&self, schema: &Schema, record: &Value) -> ValidationResult<Value> {
        let _span = tracing::debug_span!(
            "format_schema",
            schema_id = %schema.schema_id,
            schema_version = %schema.schema_version
        )
        .entered();
        self.format(&schema.fields, record)
    }

    fn format_root(&self, fields: &SchemaFields, record: &Value, pass: Pass) -> ValidationResult<Value> {
        let empty = Map::new();
        let map = match record {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                tracing::debug!(kind = json_type_name(other), "Root value is not a record");
                &empty
            }
        };

        self.format_record("", map, fields, pass, UnknownKeys::Drop)
            .map(Value::Object)
            .inspect_err(log_failure)
    }

    fn format_value(&self, path: &str, value: &Value, node: &SchemaNode, pass: Pass) -> ValidationResult<Value> {
        match node.field_type {
            FieldType::Array => self.format_list(path, value, node, pass),
            FieldType::Object => self.format_object(path, value, node, pass),
            _ => self.format_scalar(path, value, node, pass),
        }
    }

    fn format_list(&self, path: &str, value: &Value, node: &SchemaNode, pass: Pass) -> ValidationResult<Value> {
        validate::check_required(path, value, node)?;

        let items = coerce::to_array(value);
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::Object(record) => {
                    let item_path = format!("{}[{}]", path, i);
                    let formatted = self.format_record(
                        &item_path,
                        record,
                        &node.variables,
                        pass,
                        UnknownKeys::PassThrough,
                    )?;
                    out.push(Value::Object(formatted));
                }
                other => out.push(other.clone()),
            }
        }
        Ok(Value::Array(out))
    }

    fn format_object(&self, path: &str, value: &Value, node: &SchemaNode, pass: Pass) -> ValidationResult<Value> {
        validate::check_required(path, value, node)?;

        let record = coerce::to_object(value);
        self.format_record(path, &record, &node.variables, pass, UnknownKeys::PassThrough)
            .map(Value::Object)
    }

    fn format_record(
        &self,
        prefix: &str,
        record: &Map<String, Value>,
        fields: &SchemaFields,
        pass: Pass,
        unknown: UnknownKeys,
    ) -> ValidationResult<Map<String, Value>> {
        let mut out = Map::new();

        for (name, node) in fields.iter() {
            let path = make_path(prefix, name);
            let raw = record.get(name).filter(|v| !is_blank(v));

            let Some(value) = raw.or(node.default.as_ref()) else {
                if node.required {
                    return Err(ValidationError::missing_required(&path));
                }
                continue;
            };

            let formatted = self.format_value(&path, value, node, pass)?;
            if !validate::is_empty(&formatted) {
                out.insert(name.to_string(), formatted);
            }
        }

        if unknown == UnknownKeys::PassThrough {
            for (key, value) in record {
                if !fields.contains(key) && !validate::is_empty(value) {
                    out.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(out)
    }

    fn format_scalar(&self, path: &str, value: &Value, node: &SchemaNode, pass: Pass) -> ValidationResult<Value> {
        let trimmed;
        let value = match value {
            Value::String(s) => {
                trimmed = Value::String(s.trim().to_string());
                &trimmed
            }
            other => other,
        };

        validate::check_required(path, value, node)?;

        let mut value = self.cast_to(value, node.field_type, node.decimals);

        if node.field_type.is_numeric() {
            validate::check_min(path, &value, node)?;
            validate::check_max(path, &value, node)?;
        }

        validate::check_options(path, &value, node)?;

        let send_type = node.send_type();
        if send_type != node.field_type {
            value = self.cast_to(&value, send_type, node.decimals);
        }

        if send_type == FieldType::String {
            let text = value.as_str().unwrap_or_default();
            validate::check_limit(path, text, node)?;
            let cleaned = validate::check_characters(path, text, node, pass.character_mode(node))?;
            value = Value::String(cleaned);
        }

        Ok(value)
    }
}

/// Null and whitespace-only strings count as "no value given"
fn is_blank(value: &Value) -> bool {
    matches!(value, Value::Null) || value.as_str().is_some_and(|s| s.trim().is_empty())
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn log_failure(err: &ValidationError) {
    tracing::debug!(field = err.field(), kind = %err.kind(), "Formatting failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ValidationErrorKind;
    use serde_json::json;

    fn formatter() -> Formatter {
        Formatter::default()
    }

    fn amount_node() -> SchemaNode {
        SchemaNode::float()
            .min(0)
            .max(9999.99)
            .decimals(2)
            .send_as(FieldType::String)
            .limit(10)
    }

    #[test]
    fn test_amount_formatted_as_string() {
        let out = formatter().format_field("amount", &json!(12.3), &amount_node()).unwrap();
        assert_eq!(out, json!("12.30"));
    }

    #[test]
    fn test_amount_out_of_range() {
        let err = formatter()
            .format_field("amount", &json!(10000), &amount_node())
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);
        assert_eq!(err.field(), "amount");
    }

    #[test]
    fn test_amount_from_string_input() {
        let out = formatter().format_field("amount", &json!(" 7.005 "), &amount_node()).unwrap();
        assert_eq!(out, json!("7.01"));
    }

    #[test]
    fn test_required_after_trim() {
        let node = SchemaNode::string().required();
        let err = formatter().format_field("action", &json!("   "), &node).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingRequiredValue);
    }

    #[test]
    fn test_options_checked_after_cast() {
        let node = SchemaNode::int().options([1, 2, 3]);
        assert_eq!(formatter().format_field("n", &json!("2"), &node).unwrap(), json!(2));
        let err = formatter().format_field("n", &json!("4"), &node).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::InvalidOption);
    }

    #[test]
    fn test_limit_on_final_string() {
        let node = SchemaNode::string().limit(2);
        let err = formatter().format_field("language", &json!("eng"), &node).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::LengthExceeded);
    }

    #[test]
    fn test_reject_and_sanitize() {
        let node = SchemaNode::string().reject([" ", "<", ">"]);
        let err = formatter().format_field("order_no", &json!("a<b"), &node).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::DisallowedCharacters);
        assert_eq!(err.matches(), ["<".to_string()]);

        let out = formatter().sanitize_field("order_no", &json!("a<b"), &node).unwrap();
        assert_eq!(out, json!("ab"));
    }

    #[test]
    fn test_node_level_strip_mode() {
        let node = SchemaNode::string().strip(["$"]);
        let out = formatter().format_field("desc", &json!("$5 off"), &node).unwrap();
        assert_eq!(out, json!("5 off"));
    }

    #[test]
    fn test_nested_list_error_path() {
        let items = SchemaFields::new().with("quantity", SchemaNode::int().min(0));
        let fields = SchemaFields::new().with("items", SchemaNode::array(items));

        let err = formatter()
            .format(&fields, &json!({ "items": [{ "quantity": -1 }] }))
            .unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::OutOfRange);
        assert_eq!(err.field(), "items[0].quantity");
    }

    #[test]
    fn test_object_drops_empty_and_keeps_unknown() {
        let fields = SchemaFields::new().with(
            "contact",
            SchemaNode::object(
                SchemaFields::new()
                    .with("first_name", SchemaNode::string().limit(30))
                    .with("phone", SchemaNode::string()),
            ),
        );

        let out = formatter()
            .format(
                &fields,
                &json!({ "contact": { "first_name": " Ada ", "phone": "  ", "nickname": "al" } }),
            )
            .unwrap();
        assert_eq!(out, json!({ "contact": { "first_name": "Ada", "nickname": "al" } }));
    }

    #[test]
    fn test_top_level_unknown_dropped() {
        let fields = SchemaFields::new().with("order_no", SchemaNode::string());
        let out = formatter()
            .format(&fields, &json!({ "order_no": "A1", "secret": "x" }))
            .unwrap();
        assert_eq!(out, json!({ "order_no": "A1" }));
    }

    #[test]
    fn test_required_absent_fails() {
        let fields = SchemaFields::new().with("txn_total", SchemaNode::float().required());
        let err = formatter().format(&fields, &json!({})).unwrap_err();
        assert_eq!(err.kind(), ValidationErrorKind::MissingRequiredValue);
        assert_eq!(err.field(), "txn_total");
    }

    #[test]
    fn test_default_applied_when_absent() {
        let fields = SchemaFields::new()
            .with("action", SchemaNode::string().required().default_value("preload"))
            .with("language", SchemaNode::string().options(["en", "fr"]).default_value("en"));
        let out = formatter().format(&fields, &json!({ "language": "" })).unwrap();
        assert_eq!(out, json!({ "action": "preload", "language": "en" }));
    }

    #[test]
    fn test_empty_optional_int_is_absent() {
        let fields = SchemaFields::new().with("quantity", SchemaNode::int());
        let out = formatter().format(&fields, &json!({ "quantity": "" })).unwrap();
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_whitespace_optional_int_is_absent() {
        let fields = SchemaFields::new().with("quantity", SchemaNode::int());
        let out = formatter().format(&fields, &json!({ "quantity": "   " })).unwrap();
        assert_eq!(out, json!({}));
    }

    #[test]
    fn test_whitespace_required_uses_default() {
        let fields = SchemaFields::new().with("crypt_type", SchemaNode::string().required().default_value("7"));
        let out = formatter().format(&fields, &json!({ "crypt_type": " \t " })).unwrap();
        assert_eq!(out, json!({ "crypt_type": "7" }));
    }

    #[test]
    fn test_non_record_root_is_empty() {
        let fields = SchemaFields::new().with("n", SchemaNode::int());
        assert_eq!(formatter().format(&fields, &json!("text")).unwrap(), json!({}));
    }

    #[test]
    fn test_configured_precision_used() {
        let formatter = Formatter::new(FormatConfig::default().with_precision(3)).unwrap();
        let node = SchemaNode::float().send_as(FieldType::String);
        assert_eq!(formatter.format_field("rate", &json!(0.5), &node).unwrap(), json!("0.500"));
    }

    #[test]
    fn test_localized_output_formats_again() {
        let node = SchemaNode::float().decimals(2).send_as(FieldType::String);
        let cases = [
            (".", ",", 1234.5, "1,234.50"),
            (",", "", 12.3, "12,30"),
            (",", ".", 1234.5, "1.234,50"),
        ];
        for (decimal, thousands, input, expected) in cases {
            let formatter = Formatter::new(FormatConfig::default().with_separators(decimal, thousands)).unwrap();

            let once = formatter.format_field("amount", &json!(input), &node).unwrap();
            assert_eq!(once, json!(expected));
            let twice = formatter.format_field("amount", &once, &node).unwrap();
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Formatter::new(FormatConfig::default().with_precision(99)).is_err());
    }
}
