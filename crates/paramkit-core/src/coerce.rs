//! Field coercions for form-style text values.
//!
//! Use these with `#[serde(deserialize_with = "...")]` on fields of a type
//! validated through [`Typed`](crate::Typed).
//!
//! ```rust
//! use paramkit_core::{coerce, from_extracted, ExtractedObject};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Signup {
//!     #[serde(default, deserialize_with = "coerce::checkbox")]
//!     consent: bool,
//!     #[serde(deserialize_with = "coerce::bool_from_string")]
//!     newsletter: bool,
//! }
//!
//! let object: ExtractedObject = vec![("consent", "on"), ("newsletter", "false")].into_iter().collect();
//! let signup: Signup = from_extracted(object).unwrap();
//! assert!(signup.consent);
//! assert!(!signup.newsletter);
//!
//! let object: ExtractedObject = vec![("newsletter", "true")].into_iter().collect();
//! let signup: Signup = from_extracted(object).unwrap();
//! assert!(!signup.consent);
//! ```

use serde::de::{Deserialize, Deserializer, Error, Unexpected};

/// Value an HTML checkbox submits when it is checked.
pub const CHECKBOX_ON: &str = "on";

/// Reads an HTML checkbox: `"on"` is `true`.
///
/// Browsers omit unchecked checkboxes entirely, so pair this with
/// `#[serde(default)]` to read a missing field as `false`.
///
/// # Errors
///
/// Fails for any value other than `"on"`.
pub fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    if value == CHECKBOX_ON {
        Ok(true)
    } else {
        Err(D::Error::invalid_value(
            Unexpected::Str(&value),
            &"\"on\" or no value",
        ))
    }
}

/// Reads the strings `"true"` and `"false"` as a boolean.
///
/// # Errors
///
/// Fails for any other value.
pub fn bool_from_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = String::deserialize(deserializer)?;
    match value.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(D::Error::invalid_value(
            Unexpected::Str(&value),
            &"\"true\" or \"false\"",
        )),
    }
}
