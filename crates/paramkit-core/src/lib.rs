//! # paramkit Core
//!
//! Core types shared by the paramkit crates.
//!
//! This crate provides the data model that sits between request extraction
//! and schema validation:
//!
//! - [`ExtractedObject`] - Normalized key/value structure handed to a schema
//! - [`FieldValue`] / [`Scalar`] - A single value or an ordered sequence of values
//! - [`UploadedFile`] - Opaque file upload, passed through untouched
//! - [`Schema`] - The validation boundary, synchronous or deferred
//! - [`Deferred`] - A value that is either ready now or behind a single await
//! - [`ValidationError`] / [`ValidationOutcome`] - Structured validation failures
//!
//! ## Example
//!
//! ```rust
//! use paramkit_core::{typed, ExtractedObject, FieldValue, Schema};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize, PartialEq)]
//! struct User {
//!     id: String,
//!     age: u32,
//! }
//!
//! let mut object = ExtractedObject::new();
//! object.insert("id", FieldValue::text("id1"));
//! object.insert("age", FieldValue::text("10"));
//!
//! let schema = typed::<User>();
//! let user = schema.validate(object).into_ready().ok().unwrap().unwrap();
//! assert_eq!(user, User { id: "id1".into(), age: 10 });
//! ```

#![doc(html_root_url = "https://docs.rs/paramkit-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
mod de;
mod deferred;
mod error;
mod outcome;
mod schema;
mod value;

pub use de::from_extracted;
pub use deferred::Deferred;
pub use error::{Issue, PathSegment, ValidationError};
pub use outcome::ValidationOutcome;
pub use schema::{async_schema_fn, schema_fn, typed, AsyncSchemaFn, Schema, SchemaFn, Typed};
pub use value::{ExtractedObject, FieldValue, Scalar, UploadedFile};
