//! Path mutation failures

use thiserror::Error;

/// Failure for one path during multi-path mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A segment of the path does not exist
    #[error("Path '{0}' not found")]
    NotFound(String),

    /// The transformation rejected the current value
    #[error("Transform failed at '{path}': {message}")]
    Transform { path: String, message: String },
}

impl PathError {
    /// The path this failure belongs to
    pub fn path(&self) -> &str {
        match self {
            PathError::NotFound(path) => path,
            PathError::Transform { path, .. } => path,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PathError::NotFound(_))
    }
}
