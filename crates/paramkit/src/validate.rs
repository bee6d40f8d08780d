//! Validation wrappers.
//!
//! Both wrappers run the schema exactly once. A schema that finishes
//! synchronously yields a ready [`Deferred`]; a deferred schema makes the
//! wrapper deferred as well.

use paramkit_core::{Deferred, ExtractedObject, Schema, ValidationError, ValidationOutcome};
use tracing::debug;

use crate::ParseError;

/// Validates `extracted` and fails with the schema's error.
///
/// The [`ValidationError`] is returned as-is inside
/// [`ParseError::Validation`].
///
/// # Example
///
/// ```rust
/// use paramkit::{typed, validate, ExtractedObject};
///
/// let object: ExtractedObject = vec![("age", "10")].into_iter().collect();
/// let age = validate(object, &typed::<std::collections::HashMap<String, u32>>())
///     .into_ready()
///     .ok()
///     .unwrap()
///     .unwrap();
/// assert_eq!(age["age"], 10);
/// ```
pub fn validate<'a, S>(
    extracted: ExtractedObject,
    schema: &'a S,
) -> Deferred<'a, Result<S::Output, ParseError>>
where
    S: Schema + ?Sized,
    S::Output: 'a,
{
    schema.validate(extracted).map(|result| {
        result.map_err(|error| {
            log_failure(&error);
            ParseError::Validation(error)
        })
    })
}

/// Validates `extracted` and reports failure as a value.
///
/// # Example
///
/// ```rust
/// use paramkit::{typed, validate_safe, ExtractedObject};
///
/// let object: ExtractedObject = vec![("age", "ten")].into_iter().collect();
/// let outcome = validate_safe(object, &typed::<std::collections::HashMap<String, u32>>())
///     .into_ready()
///     .ok()
///     .unwrap();
///
/// assert!(!outcome.success());
/// ```
pub fn validate_safe<'a, S>(
    extracted: ExtractedObject,
    schema: &'a S,
) -> Deferred<'a, ValidationOutcome<S::Output>>
where
    S: Schema + ?Sized,
    S::Output: 'a,
{
    schema.validate(extracted).map(|result| {
        if let Err(error) = &result {
            log_failure(error);
        }
        ValidationOutcome::from(result)
    })
}

fn log_failure(error: &ValidationError) {
    debug!(issues = error.issues().len(), "validation failed");
}
