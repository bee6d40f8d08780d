//! The schema boundary.
//!
//! A [`Schema`] turns an [`ExtractedObject`] into a typed value or a
//! [`ValidationError`]. paramkit implements no validation rules itself: the
//! built-in [`Typed`] schema delegates to `serde`, and any other engine can be
//! plugged in by implementing the trait or wrapping a closure.

use crate::{de, Deferred, ExtractedObject, ValidationError};
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Validates extracted request data.
///
/// Validation may finish immediately or behind a single await; callers treat
/// both the same way by awaiting the returned [`Deferred`].
///
/// # Implementing `Schema`
///
/// ```rust
/// use paramkit_core::{Deferred, ExtractedObject, FieldValue, Issue, Schema, ValidationError};
///
/// /// Accepts any object that carries a non-empty `token`.
/// struct TokenSchema;
///
/// impl Schema for TokenSchema {
///     type Output = String;
///
///     fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<String, ValidationError>> {
///         let result = match value.get("token").and_then(FieldValue::as_text) {
///             Some(token) if !token.is_empty() => Ok(token.to_owned()),
///             _ => Err(ValidationError::single(vec!["token".into()], "Required")),
///         };
///         Deferred::ready(result)
///     }
/// }
/// ```
pub trait Schema: Send + Sync {
    /// The validated type.
    type Output: Send;

    /// Validates and coerces the extracted object.
    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<Self::Output, ValidationError>>;
}

impl<S: Schema + ?Sized> Schema for &S {
    type Output = S::Output;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<Self::Output, ValidationError>> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    type Output = S::Output;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<Self::Output, ValidationError>> {
        (**self).validate(value)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    type Output = S::Output;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<Self::Output, ValidationError>> {
        (**self).validate(value)
    }
}

/// Synchronous schema backed by `serde`.
///
/// The target type is deserialized straight from the extracted object. Text
/// is coerced to numbers and booleans on demand, and a single value is
/// accepted where a sequence is expected.
///
/// Deserialization stops at the first bad value, so a failure carries exactly
/// one [`Issue`](crate::Issue) even when several fields are invalid. Use
/// [`schema_fn`] with a validation engine to report every field.
///
/// # Example
///
/// ```rust
/// use paramkit_core::{typed, ExtractedObject, Schema};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Search {
///     q: String,
///     #[serde(default)]
///     tags: Vec<String>,
/// }
///
/// let object: ExtractedObject = vec![("q", "rust"), ("tags", "lang")].into_iter().collect();
/// let search = typed::<Search>().validate(object).into_ready().ok().unwrap().unwrap();
///
/// assert_eq!(search.q, "rust");
/// assert_eq!(search.tags, vec!["lang"]);
/// ```
pub struct Typed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Typed<T> {
    /// Creates the schema.
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Typed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Typed<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> Copy for Typed<T> {}

impl<T> fmt::Debug for Typed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Typed")
            .field(&std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned + Send> Schema for Typed<T> {
    type Output = T;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<T, ValidationError>> {
        Deferred::ready(de::from_extracted(value))
    }
}

/// Shorthand for [`Typed::new`].
#[must_use]
pub fn typed<T>() -> Typed<T> {
    Typed::new()
}

/// Synchronous schema built from a closure. See [`schema_fn`].
#[derive(Clone, Copy)]
pub struct SchemaFn<F> {
    f: F,
}

impl<F> fmt::Debug for SchemaFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaFn").finish_non_exhaustive()
    }
}

impl<F, T> Schema for SchemaFn<F>
where
    F: Fn(ExtractedObject) -> Result<T, ValidationError> + Send + Sync,
    T: Send,
{
    type Output = T;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<T, ValidationError>> {
        Deferred::ready((self.f)(value))
    }
}

/// Wraps a synchronous validation closure as a [`Schema`].
///
/// # Example
///
/// ```rust
/// use paramkit_core::{from_extracted, schema_fn, ExtractedObject, Schema};
///
/// let schema = schema_fn(|value: ExtractedObject| from_extracted::<std::collections::HashMap<String, String>>(value));
/// let object: ExtractedObject = vec![("a", "1")].into_iter().collect();
/// let map = schema.validate(object).into_ready().ok().unwrap().unwrap();
/// assert_eq!(map["a"], "1");
/// ```
pub fn schema_fn<F, T>(f: F) -> SchemaFn<F>
where
    F: Fn(ExtractedObject) -> Result<T, ValidationError> + Send + Sync,
{
    SchemaFn { f }
}

/// Deferred schema built from a closure returning a future. See [`async_schema_fn`].
#[derive(Clone, Copy)]
pub struct AsyncSchemaFn<F> {
    f: F,
}

impl<F> fmt::Debug for AsyncSchemaFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSchemaFn").finish_non_exhaustive()
    }
}

impl<F, Fut, T> Schema for AsyncSchemaFn<F>
where
    F: Fn(ExtractedObject) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, ValidationError>> + Send + 'static,
    T: Send,
{
    type Output = T;

    fn validate(&self, value: ExtractedObject) -> Deferred<'_, Result<T, ValidationError>> {
        Deferred::pending((self.f)(value))
    }
}

/// Wraps an asynchronous validation closure as a [`Schema`].
///
/// Use this for validation that has to await something, such as a uniqueness
/// lookup.
pub fn async_schema_fn<F, Fut, T>(f: F) -> AsyncSchemaFn<F>
where
    F: Fn(ExtractedObject) -> Fut + Send + Sync,
    Fut: Future<Output = Result<T, ValidationError>> + Send + 'static,
{
    AsyncSchemaFn { f }
}
