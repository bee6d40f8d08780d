//! Discriminated validation results.

use crate::ValidationError;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Result of a safe validation: success with data, or failure with the
/// structured error.
///
/// Branch on [`success`](Self::success) or match the variants directly.
///
/// # Example
///
/// ```rust
/// use paramkit_core::{ValidationError, ValidationOutcome};
///
/// let ok: ValidationOutcome<u32> = Ok(10).into();
/// assert!(ok.success());
/// assert_eq!(ok.data(), Some(&10));
///
/// let failed: ValidationOutcome<u32> =
///     Err(ValidationError::single(vec!["age".into()], "Expected number")).into();
/// assert!(!failed.success());
/// assert_eq!(failed.error().unwrap().issues().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome<T> {
    /// Validation passed.
    Success {
        /// The validated value.
        data: T,
    },
    /// Validation failed.
    Failure {
        /// The issues reported by the schema.
        error: ValidationError,
    },
}

impl<T> ValidationOutcome<T> {
    /// Returns true for [`ValidationOutcome::Success`].
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the validated value on success.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error on failure.
    #[must_use]
    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Converts into a `Result`.
    pub fn into_result(self) -> Result<T, ValidationError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }

    /// Transforms the validated value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ValidationOutcome<U> {
        match self {
            Self::Success { data } => ValidationOutcome::Success { data: f(data) },
            Self::Failure { error } => ValidationOutcome::Failure { error },
        }
    }
}

impl<T> From<Result<T, ValidationError>> for ValidationOutcome<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(data) => Self::Success { data },
            Err(error) => Self::Failure { error },
        }
    }
}

impl<T> From<ValidationOutcome<T>> for Result<T, ValidationError> {
    fn from(outcome: ValidationOutcome<T>) -> Self {
        outcome.into_result()
    }
}

/// Serialized as `{"success": true, "data": ...}` or
/// `{"success": false, "error": {"issues": [...]}}`.
impl<T: Serialize> Serialize for ValidationOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationOutcome", 2)?;
        state.serialize_field("success", &self.success())?;
        match self {
            Self::Success { data } => state.serialize_field("data", data)?,
            Self::Failure { error } => state.serialize_field("error", error)?,
        }
        state.end()
    }
}
