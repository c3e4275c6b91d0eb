//! Redaction of value trees for safe logging
//!
//! Every scalar leaf is rewritten; records and lists keep their shape and keys.
//! - `mask`: a run of one character, same length as the original text
//! - `hash`: leading characters of a hex digest, same length as the original
//! - `obfuscate`: character classes replaced by representatives, so the
//!   layout (case pattern, digits, whitespace, punctuation) stays visible
//!
//! Null leaves carry no content and are left as they are.

mod digest;

use serde_json::{Map, Number, Value};

use crate::path::{self, PathError, ValuePath};

pub use digest::{HashAlgorithm, UnknownAlgorithm};

/// Default mask character
pub const MASK_CHAR: char = '*';

/// A redaction strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redaction {
    Mask(char),
    Hash(HashAlgorithm),
    Obfuscate,
}

impl Default for Redaction {
    fn default() -> Self {
        Redaction::Mask(MASK_CHAR)
    }
}

impl Redaction {
    /// Returns a redacted copy of `tree`
    pub fn apply(&self, tree: &Value) -> Value {
        map_leaves(tree, &|leaf| self.redact_leaf(leaf))
    }

    fn redact_leaf(&self, leaf: &Value) -> Value {
        if leaf.is_null() {
            return Value::Null;
        }
        match self {
            Redaction::Mask(ch) => {
                let len = leaf_text(leaf).chars().count();
                Value::String(std::iter::repeat(*ch).take(len).collect())
            }
            Redaction::Hash(algorithm) => {
                let text = leaf_text(leaf);
                Value::String(digest_prefix(*algorithm, &text, text.chars().count()))
            }
            Redaction::Obfuscate => obfuscate_leaf(leaf),
        }
    }
}

/// Masks every scalar leaf with `ch`
pub fn mask(tree: &Value, ch: char) -> Value {
    Redaction::Mask(ch).apply(tree)
}

/// Replaces every scalar leaf with a same-length digest prefix
pub fn hash(tree: &Value, algorithm: HashAlgorithm) -> Value {
    Redaction::Hash(algorithm).apply(tree)
}

/// Replaces letters, digits and whitespace with representatives, keeping
/// numbers numeric and booleans boolean
pub fn obfuscate(tree: &Value) -> Value {
    Redaction::Obfuscate.apply(tree)
}

/// Redacts only the subtrees at `paths`, in place.
///
/// Paths that do not exist are returned as failures; the others are still
/// redacted.
pub fn redact_paths<I, P>(tree: &mut Value, paths: I, redaction: Redaction) -> Vec<PathError>
where
    I: IntoIterator<Item = P>,
    P: Into<ValuePath>,
{
    path::modify_multiple(tree, paths, |value| {
        Ok::<_, std::convert::Infallible>(redaction.apply(value))
    })
}

fn map_leaves<F>(tree: &Value, f: &F) -> Value
where
    F: Fn(&Value) -> Value,
{
    match tree {
        Value::Array(items) => Value::Array(items.iter().map(|item| map_leaves(item, f)).collect()),
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), map_leaves(value, f));
            }
            Value::Object(out)
        }
        leaf => f(leaf),
    }
}

/// Textual form whose length is preserved
fn leaf_text(leaf: &Value) -> String {
    match leaf {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First `len` characters of the hex digest, repeating the digest when the
/// value is longer than it
fn digest_prefix(algorithm: HashAlgorithm, text: &str, len: usize) -> String {
    let digest = algorithm.hex_digest(text);
    digest.chars().cycle().take(len).collect()
}

fn obfuscate_char(c: char) -> char {
    if c.is_whitespace() {
        ' '
    } else if c.is_uppercase() {
        'X'
    } else if c.is_alphabetic() {
        'x'
    } else if c.is_numeric() {
        '9'
    } else {
        c
    }
}

fn obfuscate_leaf(leaf: &Value) -> Value {
    match leaf {
        Value::String(s) => Value::String(s.chars().map(obfuscate_char).collect()),
        Value::Number(n) => {
            // Only digits change, so exponents and signs still parse
            let text: String = n
                .to_string()
                .chars()
                .map(|c| if c.is_ascii_digit() { '9' } else { c })
                .collect();
            text.parse::<Number>()
                .map(Value::Number)
                .unwrap_or(Value::String(text))
        }
        other => other.clone(),
    }
}
