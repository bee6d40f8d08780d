//! # Paramkit Extract
//!
//! Turns route parameters, query strings and form bodies into an
//! [`ExtractedObject`](paramkit_core::ExtractedObject) ready for validation.
//!
//! ## Sources
//!
//! | Source | Input | Resolution |
//! |--------|-------|------------|
//! | [`RouteParams`] | name → value mapping from a router | synchronous |
//! | [`QuerySource`] | `&str`, [`Entries`], [`http::Uri`], [`http::Request`], [`ExtractionContext`] | synchronous |
//! | [`FormSource`] | [`Entries`], [`ExtractionContext`], `http::Request<Bytes>` | one `await` |
//!
//! ## Extraction
//!
//! By default repeated keys collapse into ordered lists and single keys stay
//! scalar. [`Options::parser`] replaces that strategy for one call.
//!
//! ```rust
//! use paramkit_core::FieldValue;
//! use paramkit_extract::{Entries, Options, QuerySource};
//!
//! let entries = "id=id1&friends=a&friends=b".query_entries().unwrap();
//! let object = Options::<Entries>::default().extract(&entries).unwrap();
//!
//! assert_eq!(object.get("id"), Some(&FieldValue::text("id1")));
//! assert_eq!(object.get("friends"), Some(&FieldValue::texts(["a", "b"])));
//! ```
//!
//! ## Error Handling
//!
//! Failures that happen before validation are reported as
//! [`ExtractionError`], which maps to an HTTP status:
//!
//! ```rust
//! use paramkit_extract::ExtractionError;
//!
//! let err = ExtractionError::unsupported_media_type("a form body", Some("application/json"));
//! assert_eq!(err.status_code(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod entries;
mod error;
mod form;
mod multipart;
mod params;
mod query;
mod strategy;

pub use context::{ExtractionContext, ExtractionContextBuilder};
pub use entries::Entries;
pub use error::{ExtractionError, ExtractionSource};
pub use form::{
    FormConfig, FormSource, DEFAULT_MAX_BODY_SIZE, DEFAULT_MAX_FIELDS, DEFAULT_MAX_FIELD_SIZE,
    DEFAULT_MAX_MULTIPART_SIZE,
};
pub use params::RouteParams;
pub use query::{parse_query_string, QuerySource};
pub use strategy::{collapse, DefaultExtract, Options};
