//! Schema type definitions
//!
//! Supported canonical types:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - array: Ordered list of records, each described by `variables`
//! - object: Single record described by `variables`
//!
//! A schema node describes the expected input type of one field, the type it is
//! sent as, and the constraints checked on the way.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};

use crate::validate::to_decimal;

/// Canonical field types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    #[default]
    String,
    /// 64-bit signed integer
    #[serde(alias = "integer")]
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    #[serde(alias = "boolean")]
    Bool,
    /// Ordered list of records
    Array,
    /// Single record
    Object,
}

impl FieldType {
    /// Returns the type name for messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// True for `array` and `object`
    pub fn is_container(&self) -> bool {
        matches!(self, FieldType::Array | FieldType::Object)
    }

    /// True for `int` and `float`
    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Int | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// How disallowed characters are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterMode {
    /// Fail when any disallowed substring is present
    #[default]
    Reject,
    /// Silently remove every disallowed substring
    Strip,
}

/// Disallowed characters or substrings for a string field.
///
/// Accepts either a bare list (reject mode) or
/// `{ "chars": [...], "mode": "strip" }` in schema files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "DisallowedRepr")]
pub struct Disallowed {
    /// Substrings that may not appear in the final value
    pub chars: Vec<String>,
    /// Reject or strip
    pub mode: CharacterMode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DisallowedRepr {
    List(Vec<String>),
    Detailed {
        chars: Vec<String>,
        #[serde(default)]
        mode: CharacterMode,
    },
}

impl From<DisallowedRepr> for Disallowed {
    fn from(repr: DisallowedRepr) -> Self {
        match repr {
            DisallowedRepr::List(chars) => Self {
                chars,
                mode: CharacterMode::Reject,
            },
            DisallowedRepr::Detailed { chars, mode } => Self { chars, mode },
        }
    }
}

impl Serialize for Disallowed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.mode {
            CharacterMode::Reject => self.chars.serialize(serializer),
            CharacterMode::Strip => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("chars", &self.chars)?;
                map.serialize_entry("mode", &self.mode)?;
                map.end()
            }
        }
    }
}

/// Declarative description of one field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Input type the raw value is coerced to
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    /// Output type, defaults to `field_type`
    #[serde(
        default,
        alias = "sendType",
        skip_serializing_if = "Option::is_none"
    )]
    pub send_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,
    /// Lower bound, number or numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<Value>,
    /// Upper bound, number or numeric string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Value>,
    /// Allowed values, compared with strict equality
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Value>,
    /// Maximum character length of the final string value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace: Option<Disallowed>,
    /// Precision used when a float is sent as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Value used when the field is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Sub-fields of `array` and `object` nodes
    #[serde(default, skip_serializing_if = "SchemaFields::is_empty")]
    pub variables: SchemaFields,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl SchemaNode {
    /// Creates an unconstrained node of the given type
    pub fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn int() -> Self {
        Self::of(FieldType::Int)
    }

    pub fn float() -> Self {
        Self::of(FieldType::Float)
    }

    pub fn bool() -> Self {
        Self::of(FieldType::Bool)
    }

    /// Creates a list-of-records node
    pub fn array(variables: SchemaFields) -> Self {
        Self {
            variables,
            ..Self::of(FieldType::Array)
        }
    }

    /// Creates a single-record node
    pub fn object(variables: SchemaFields) -> Self {
        Self {
            variables,
            ..Self::of(FieldType::Object)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn options<I, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn send_as(mut self, send_type: FieldType) -> Self {
        self.send_type = Some(send_type);
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Rejects values containing any of `chars`
    pub fn reject<I, S>(self, chars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallow(chars, CharacterMode::Reject)
    }

    /// Removes any of `chars` from the value
    pub fn strip<I, S>(self, chars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disallow(chars, CharacterMode::Strip)
    }

    fn disallow<I, S>(mut self, chars: I, mode: CharacterMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replace = Some(Disallowed {
            chars: chars.into_iter().map(Into::into).collect(),
            mode,
        });
        self
    }

    /// Output type, falling back to the input type
    pub fn send_type(&self) -> FieldType {
        self.send_type.unwrap_or(self.field_type)
    }

    /// Checks the node (and its variables) is well formed.
    ///
    /// `path` is the field path used in the returned message.
    pub fn validate_structure(&self, path: &str) -> Result<(), String> {
        if self.field_type.is_container() {
            if self.variables.is_empty() {
                return Err(format!(
                    "'{}' is of type {} but declares no variables",
                    path, self.field_type
                ));
            }
            for (name, node) in self.variables.iter() {
                node.validate_structure(&format!("{}.{}", path, name))?;
            }
        } else {
            if !self.variables.is_empty() {
                return Err(format!(
                    "'{}' is a scalar {} field but declares variables",
                    path, self.field_type
                ));
            }
            if self.send_type().is_container() {
                return Err(format!(
                    "'{}' is a scalar field and cannot be sent as {}",
                    path,
                    self.send_type()
                ));
            }
        }

        let min = self.min.as_ref().and_then(to_decimal);
        let max = self.max.as_ref().and_then(to_decimal);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(format!("'{}' has min {} greater than max {}", path, min, max));
            }
        }

        Ok(())
    }

    /// Condensed description: scalars keep their constraints, containers become
    /// a map of their variables.
    pub fn condensed(&self) -> Value {
        if self.field_type.is_container() {
            self.variables.condensed()
        } else {
            serde_json::to_value(self).unwrap_or_else(|_| json!({}))
        }
    }
}

/// Ordered mapping from field name to schema node.
///
/// Declaration order is kept: it decides which failure is reported first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaFields(Vec<(String, SchemaNode)>);

impl SchemaFields {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, node: SchemaNode) -> Self {
        self.insert(name, node);
        self
    }

    /// Inserts or replaces a field, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, node: SchemaNode) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = node,
            None => self.0.push((name, node)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SchemaNode> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, node)| node)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaNode)> {
        self.0.iter().map(|(n, node)| (n.as_str(), node))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Condensed view of every field
    pub fn condensed(&self) -> Value {
        let mut out = Map::new();
        for (name, node) in self.iter() {
            out.insert(name.to_string(), node.condensed());
        }
        Value::Object(out)
    }
}

impl<K: Into<String>> FromIterator<(K, SchemaNode)> for SchemaFields {
    fn from_iter<T: IntoIterator<Item = (K, SchemaNode)>>(iter: T) -> Self {
        let mut fields = SchemaFields::new();
        for (name, node) in iter {
            fields.insert(name, node);
        }
        fields
    }
}

impl Serialize for SchemaFields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, node) in &self.0 {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaFields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = SchemaFields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to schema nodes")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SchemaFields, A::Error> {
                let mut fields = SchemaFields(Vec::with_capacity(access.size_hint().unwrap_or(0)));
                while let Some((name, node)) = access.next_entry::<String, SchemaNode>()? {
                    fields.insert(name, node);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

/// Complete schema definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Unique schema identifier
    pub schema_id: String,
    /// Schema version
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Top-level field definitions
    pub fields: SchemaFields,
}

impl Schema {
    pub fn new(
        schema_id: impl Into<String>,
        schema_version: impl Into<String>,
        fields: SchemaFields,
    ) -> Self {
        Self {
            schema_id: schema_id.into(),
            schema_version: schema_version.into(),
            description: None,
            fields,
        }
    }

    /// Returns the registry key (id, version)
    pub fn key(&self) -> (&str, &str) {
        (&self.schema_id, &self.schema_version)
    }

    /// Validates the schema itself (not a record)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("Schema must declare at least one field".into());
        }
        for (name, node) in self.fields.iter() {
            node.validate_structure(name)?;
        }
        Ok(())
    }

    /// Flattened view of the schema, see [`SchemaNode::condensed`]
    pub fn condensed(&self) -> Value {
        self.fields.condensed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cart_schema() -> Schema {
        let items = SchemaFields::new()
            .with("description", SchemaNode::string().limit(200))
            .with("quantity", SchemaNode::int().min(0));
        let cart = SchemaFields::new()
            .with("items", SchemaNode::array(items))
            .with("subtotal", SchemaNode::float().min(0).decimals(2));

        Schema::new(
            "preload",
            "v1",
            SchemaFields::new()
                .with("txn_total", SchemaNode::float().required())
                .with("cart", SchemaNode::object(cart)),
        )
    }

    #[test]
    fn test_structure_valid() {
        assert!(cart_schema().validate_structure().is_ok());
    }

    #[test]
    fn test_container_without_variables_rejected() {
        let schema = Schema::new(
            "s",
            "v1",
            SchemaFields::new().with("cart", SchemaNode::of(FieldType::Object)),
        );
        let err = schema.validate_structure().unwrap_err();
        assert!(err.contains("cart"));
    }

    #[test]
    fn test_scalar_with_variables_rejected() {
        let mut node = SchemaNode::string();
        node.variables = SchemaFields::new().with("x", SchemaNode::int());
        let schema = Schema::new("s", "v1", SchemaFields::new().with("name", node));
        assert!(schema.validate_structure().is_err());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let schema = Schema::new(
            "s",
            "v1",
            SchemaFields::new().with("n", SchemaNode::int().min(10).max(1)),
        );
        assert!(schema.validate_structure().unwrap_err().contains("greater than max"));
    }

    #[test]
    fn test_deserialize_keeps_declaration_order() {
        let json = r#"{
            "schema_id": "s",
            "schema_version": "v1",
            "fields": {
                "zeta": { "type": "string" },
                "alpha": { "type": "int", "min": "1" },
                "mid": { "type": "boolean" }
            }
        }"#;
        let schema: Schema = serde_json::from_str(json).unwrap();
        let names: Vec<_> = schema.fields.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(schema.fields.get("mid").unwrap().field_type, FieldType::Bool);
    }

    #[test]
    fn test_replace_forms() {
        let node: SchemaNode = serde_json::from_value(json!({ "replace": ["<", ">"] })).unwrap();
        assert_eq!(node.replace.unwrap().mode, CharacterMode::Reject);

        let node: SchemaNode =
            serde_json::from_value(json!({ "replace": { "chars": [" "], "mode": "strip" } }))
                .unwrap();
        let replace = node.replace.unwrap();
        assert_eq!(replace.mode, CharacterMode::Strip);
        assert_eq!(replace.chars, vec![" ".to_string()]);
    }

    #[test]
    fn test_send_type_defaults_to_type() {
        assert_eq!(SchemaNode::float().send_type(), FieldType::Float);
        assert_eq!(
            SchemaNode::float().send_as(FieldType::String).send_type(),
            FieldType::String
        );
        let node: SchemaNode =
            serde_json::from_value(json!({ "type": "float", "sendType": "string" })).unwrap();
        assert_eq!(node.send_type(), FieldType::String);
    }

    #[test]
    fn test_condensed_flattens_containers() {
        let condensed = cart_schema().condensed();
        assert_eq!(condensed["cart"]["items"]["quantity"]["type"], "int");
        assert_eq!(condensed["txn_total"]["required"], true);
        assert!(condensed["cart"].get("variables").is_none());
    }

    #[test]
    fn test_round_trip_serialization() {
        let schema = cart_schema();
        let text = serde_json::to_string(&schema).unwrap();
        let back: Schema = serde_json::from_str(&text).unwrap();
        assert_eq!(schema, back);
    }
}
