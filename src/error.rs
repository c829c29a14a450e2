//! Error types.

use thiserror::Error;

/// PathError is returned when a dot path cannot be written into a value.
///
/// Reads never fail; a path that cannot be followed simply yields `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path is empty")]
    EmptyPath,

    #[error("{path}: cannot descend into {found}")]
    NotAContainer { path: String, found: &'static str },

    #[error("{path}: segment {segment:?} is not a valid list position")]
    InvalidIndex { path: String, segment: String },
}

impl PathError {
    /// Creates a not-a-container error.
    pub fn not_a_container(path: impl Into<String>, found: &'static str) -> Self {
        PathError::NotAContainer {
            path: path.into(),
            found,
        }
    }

    /// Creates an invalid index error.
    pub fn invalid_index(path: impl Into<String>, segment: impl Into<String>) -> Self {
        PathError::InvalidIndex {
            path: path.into(),
            segment: segment.into(),
        }
    }
}

/// ParseError wraps failures to deserialize values or schemas.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
