//! # paramkit
//!
//! **Typed route parameters, query strings and form bodies**
//!
//! paramkit normalizes untyped request data into a single key/value object
//! and hands it to a schema:
//!
//! - **One shape for every source** – route parameters, query strings and
//!   urlencoded or multipart forms all become an [`ExtractedObject`]
//! - **Repeated keys become lists** – `?tag=a&tag=b` yields `["a", "b"]`,
//!   a single `?tag=a` stays a plain value
//! - **Pluggable extraction** – [`Options::parser`] replaces the default
//!   strategy for one call
//! - **Any schema** – synchronous or asynchronous, serde-backed via [`typed`]
//!   or hand-written via [`Schema`]
//! - **Throwing or safe** – `parse_*` returns [`ParseError`], `parse_*_safe`
//!   returns a [`ValidationOutcome`]
//!
//! ## Quick Start
//!
//! ```rust
//! use paramkit::{parse_query_safe, typed, Options};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Query {
//!     id: String,
//!     age: u32,
//! }
//!
//! let schema = typed::<Query>();
//! let outcome = parse_query_safe("id=id1&age=notanumber", &schema, &Options::default())
//!     .into_ready()
//!     .ok()
//!     .unwrap()
//!     .unwrap();
//!
//! assert!(!outcome.success());
//! let issue = &outcome.error().unwrap().issues()[0];
//! assert_eq!(issue.dotted_path(), "age");
//! ```
//!
//! ## Validation errors
//!
//! The serde-backed [`typed`] schema stops at the first value it cannot
//! deserialize, so its [`ValidationError`] holds a single issue. Schemas built
//! with [`schema_fn`] or [`async_schema_fn`] may report one issue per field,
//! and [`ValidationError::field_errors`] groups them by field.
//!
//! ## Pipeline
//!
//! ```text
//! source → extraction (default | parser) → schema (ready | deferred) → Result | ValidationOutcome
//! ```

#![doc(html_root_url = "https://docs.rs/paramkit/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod parse;
mod validate;

pub use error::{ParseError, ParseResult};
pub use parse::{
    parse_form, parse_form_safe, parse_params, parse_params_safe, parse_query, parse_query_safe,
};
pub use validate::{validate, validate_safe};

// Re-export core types
pub use paramkit_core as core;
pub use paramkit_core::{
    async_schema_fn, coerce, from_extracted, schema_fn, typed, Deferred, ExtractedObject,
    FieldValue, Issue, PathSegment, Scalar, Schema, UploadedFile, ValidationError,
    ValidationOutcome,
};

// Re-export extraction types
pub use paramkit_extract as extract;
pub use paramkit_extract::{
    Entries, ExtractionContext, ExtractionError, ExtractionSource, FormConfig, FormSource,
    Options, QuerySource, RouteParams,
};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use paramkit::prelude::*;
///
/// let params: RouteParams = vec![("id", "1")].into_iter().collect();
/// let outcome = parse_params_safe(&params, &typed::<std::collections::HashMap<String, u32>>(), &Options::default())
///     .into_ready()
///     .ok()
///     .unwrap()
///     .unwrap();
/// assert!(outcome.success());
/// ```
pub mod prelude {
    pub use crate::{
        parse_form, parse_form_safe, parse_params, parse_params_safe, parse_query,
        parse_query_safe, ParseError,
    };

    pub use paramkit_core::{
        coerce, typed, ExtractedObject, Schema, UploadedFile, ValidationError, ValidationOutcome,
    };

    pub use paramkit_extract::{Entries, ExtractionContext, ExtractionError, Options, RouteParams};
}
