//! Turning raw sources into an [`ExtractedObject`].
//!
//! The default strategy collapses repeated keys: the first occurrence of a key
//! is stored as a single value, the second turns it into an ordered list, and
//! later occurrences are appended. A caller can replace the strategy for a
//! single call with [`Options::parser`].

use paramkit_core::{ExtractedObject, FieldValue, Scalar};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::{Entries, ExtractionError, RouteParams};

/// A source the default extraction strategy knows how to read.
pub trait DefaultExtract {
    /// Builds the object using the default collapse rules.
    fn extract_default(&self) -> ExtractedObject;
}

/// Route parameters carry one value per name.
impl DefaultExtract for RouteParams {
    fn extract_default(&self) -> ExtractedObject {
        let mut object = ExtractedObject::with_capacity(self.len());
        for (name, value) in self {
            if !object.contains_key(name) {
                object.insert(name, value);
            }
        }
        object
    }
}

impl DefaultExtract for Entries {
    fn extract_default(&self) -> ExtractedObject {
        collapse(self.iter().map(|(key, value)| (key, value.clone())))
    }
}

/// Collapses ordered pairs into an object.
///
/// ```rust
/// use paramkit_core::FieldValue;
/// use paramkit_extract::collapse;
///
/// let object = collapse(vec![("tag", "a".into()), ("id", "1".into()), ("tag", "b".into())]);
///
/// assert_eq!(object.get("id"), Some(&FieldValue::text("1")));
/// assert_eq!(object.get("tag"), Some(&FieldValue::texts(["a", "b"])));
/// ```
pub fn collapse<K, I>(pairs: I) -> ExtractedObject
where
    K: AsRef<str>,
    I: IntoIterator<Item = (K, Scalar)>,
{
    let mut object = ExtractedObject::new();
    for (key, value) in pairs {
        let key = key.as_ref();
        match object.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                object.insert(key, FieldValue::One(value));
            }
        }
    }
    object
}

type ParserFn<S> = dyn Fn(&S) -> Result<ExtractedObject, ExtractionError> + Send + Sync;

/// Per-call extraction options.
///
/// `S` is the source the parser receives: [`RouteParams`] for route
/// parameters and [`Entries`] for query strings and form bodies.
///
/// # Example
///
/// ```rust
/// use paramkit_core::ExtractedObject;
/// use paramkit_extract::{Entries, Options};
///
/// // Keep only the last value of every key.
/// let options = Options::<Entries>::new().parser(|entries: &Entries| {
///     let mut object = ExtractedObject::new();
///     for (key, value) in entries.iter() {
///         object.insert(key, value.clone());
///     }
///     Ok(object)
/// });
///
/// let entries = Entries::parse_urlencoded("a=1&a=2").unwrap();
/// let object = options.extract(&entries).unwrap();
/// assert_eq!(object.get("a").and_then(|v| v.as_text()), Some("2"));
/// ```
pub struct Options<S: ?Sized> {
    parser: Option<Arc<ParserFn<S>>>,
}

impl<S: ?Sized> Options<S> {
    /// Creates options that use the default strategy.
    #[must_use]
    pub fn new() -> Self {
        Self { parser: None }
    }

    /// Replaces the default strategy with `parser`.
    ///
    /// The parser's output is handed to the schema unchanged.
    #[must_use]
    pub fn parser<F>(mut self, parser: F) -> Self
    where
        F: Fn(&S) -> Result<ExtractedObject, ExtractionError> + Send + Sync + 'static,
    {
        self.parser = Some(Arc::new(parser));
        self
    }

    /// Returns true if a custom parser is set.
    #[must_use]
    pub fn has_parser(&self) -> bool {
        self.parser.is_some()
    }
}

impl<S: DefaultExtract + ?Sized> Options<S> {
    /// Extracts an object from `source`.
    ///
    /// Uses the custom parser when one is set, the default strategy otherwise.
    /// The two are never combined.
    pub fn extract(&self, source: &S) -> Result<ExtractedObject, ExtractionError> {
        let object = match &self.parser {
            Some(parser) => {
                trace!(strategy = "custom", "extracting parameters");
                parser(source)?
            }
            None => {
                trace!(strategy = "default", "extracting parameters");
                source.extract_default()
            }
        };
        trace!(keys = object.len(), "extracted parameters");
        Ok(object)
    }
}

impl<S: ?Sized> Default for Options<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> Clone for Options<S> {
    fn clone(&self) -> Self {
        Self {
            parser: self.parser.clone(),
        }
    }
}

impl<S: ?Sized> fmt::Debug for Options<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("parser", &self.parser.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
