//! Structured validation errors.
//!
//! A [`ValidationError`] is an ordered list of [`Issue`]s, one per failing
//! field. Schemas produce it; paramkit passes it through unmodified.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One step in the path to a failing value.
///
/// Serialized untagged, so a path reads as `["friends", 1]` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// An object key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => write!(f, "{key}"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A single failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Path from the root of the extracted object to the failing value.
    pub path: Vec<PathSegment>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Issue {
    /// Creates an issue.
    #[must_use]
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Returns the path joined with dots, e.g. `friends.1`.
    #[must_use]
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.dotted_path(), self.message)
        }
    }
}

/// Validation failure reported by a schema.
///
/// # Example
///
/// ```rust
/// use paramkit_core::{Issue, PathSegment, ValidationError};
///
/// let err = ValidationError::single(vec!["age".into()], "Expected number");
///
/// assert_eq!(err.issues().len(), 1);
/// assert_eq!(err.issues()[0].path, vec![PathSegment::Key("age".into())]);
/// assert!(err.to_string().contains("age: Expected number"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("validation failed: {}", summarize(.issues))]
pub struct ValidationError {
    issues: Vec<Issue>,
}

fn summarize(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Creates an error from a list of issues.
    #[must_use]
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    /// Creates an error with a single issue.
    #[must_use]
    pub fn single(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(path, message)])
    }

    /// Returns the issues in the order the schema reported them.
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Consumes the error and returns its issues.
    #[must_use]
    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// Returns true if no issue was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Groups issue messages by their top-level field.
    ///
    /// Issues with an empty path are grouped under the empty string.
    #[must_use]
    pub fn field_errors(&self) -> IndexMap<String, Vec<String>> {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for issue in &self.issues {
            let field = issue.path.first().map(ToString::to_string).unwrap_or_default();
            fields.entry(field).or_default().push(issue.message.clone());
        }
        fields
    }
}

impl From<Issue> for ValidationError {
    fn from(issue: Issue) -> Self {
        Self::new(vec![issue])
    }
}
