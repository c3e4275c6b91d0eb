//! Read and in-place transform access into value trees
//!
//! Records and lists are traversed uniformly. Lookups never fail: a missing
//! segment, or a leaf with segments left over, yields the default. Mutation
//! never creates missing segments.

use std::fmt;

use serde_json::Value;

use super::errors::PathError;
use super::segments::{PathSegment, ValuePath};

/// Outcome of a single-path modification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modification {
    /// The value was replaced
    Applied,
    /// Some segment did not exist; the tree is unchanged
    NotFound,
}

impl Modification {
    pub fn is_applied(&self) -> bool {
        matches!(self, Modification::Applied)
    }
}

fn child<'a>(node: &'a Value, segment: &PathSegment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get(key),
        (Value::Object(map), PathSegment::Index(i)) => map.get(&i.to_string()),
        (Value::Array(items), PathSegment::Index(i)) => items.get(*i),
        (Value::Array(items), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(|i| items.get(i))
        }
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, segment: &PathSegment) -> Option<&'a mut Value> {
    match (node, segment) {
        (Value::Object(map), PathSegment::Key(key)) => map.get_mut(key),
        (Value::Object(map), PathSegment::Index(i)) => map.get_mut(&i.to_string()),
        (Value::Array(items), PathSegment::Index(i)) => items.get_mut(*i),
        (Value::Array(items), PathSegment::Key(key)) => {
            key.parse::<usize>().ok().and_then(move |i| items.get_mut(i))
        }
        _ => None,
    }
}

/// Borrows the value at `path`, if every segment exists.
///
/// The empty path addresses nothing.
pub fn lookup<'a>(tree: &'a Value, path: impl Into<ValuePath>) -> Option<&'a Value> {
    let path = path.into();
    if path.is_empty() {
        return None;
    }
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| child(node, segment))
}

/// Mutably borrows the value at `path`, if every segment exists.
pub fn lookup_mut<'a>(tree: &'a mut Value, path: impl Into<ValuePath>) -> Option<&'a mut Value> {
    let path = path.into();
    if path.is_empty() {
        return None;
    }
    path.segments()
        .iter()
        .try_fold(tree, |node, segment| child_mut(node, segment))
}

/// Returns a copy of the value at `path`, or `default` when it is missing or
/// null.
pub fn get(tree: &Value, path: impl Into<ValuePath>, default: Value) -> Value {
    get_with(tree, path, || default)
}

/// Like [`get`], computing the default lazily.
pub fn get_with<F>(tree: &Value, path: impl Into<ValuePath>, default: F) -> Value
where
    F: FnOnce() -> Value,
{
    match lookup(tree, path) {
        Some(value) if !value.is_null() => value.clone(),
        _ => default(),
    }
}

/// Replaces the value at `path` with `f(current)`.
pub fn modify<F>(tree: &mut Value, path: impl Into<ValuePath>, f: F) -> Modification
where
    F: FnOnce(Value) -> Value,
{
    match lookup_mut(tree, path) {
        Some(slot) => {
            let current = std::mem::take(slot);
            *slot = f(current);
            Modification::Applied
        }
        None => Modification::NotFound,
    }
}

/// Replaces the value at `path` with `f(&current)`. On error the tree is left
/// unchanged and the error is returned.
pub fn try_modify<F, E>(tree: &mut Value, path: impl Into<ValuePath>, f: F) -> Result<Modification, E>
where
    F: FnOnce(&Value) -> Result<Value, E>,
{
    match lookup_mut(tree, path) {
        Some(slot) => {
            let replacement = f(slot)?;
            *slot = replacement;
            Ok(Modification::Applied)
        }
        None => Ok(Modification::NotFound),
    }
}

/// Applies `f` at every path independently.
///
/// A missing path or a failing transform is recorded and the remaining paths
/// are still processed. Returns the failures in path order.
pub fn modify_multiple<I, P, F, E>(tree: &mut Value, paths: I, mut f: F) -> Vec<PathError>
where
    I: IntoIterator<Item = P>,
    P: Into<ValuePath>,
    F: FnMut(&Value) -> Result<Value, E>,
    E: fmt::Display,
{
    let mut failures = Vec::new();
    for path in paths {
        let path = path.into();
        let failure = match try_modify(tree, &path, &mut f) {
            Ok(Modification::Applied) => None,
            Ok(Modification::NotFound) => Some(PathError::NotFound(path.to_string())),
            Err(e) => Some(PathError::Transform {
                path: path.to_string(),
                message: e.to_string(),
            }),
        };
        if let Some(failure) = failure {
            tracing::debug!(path = failure.path(), error = %failure, "Path modification failed");
            failures.push(failure);
        }
    }
    failures
}
