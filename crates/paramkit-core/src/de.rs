//! `serde` deserializer over an [`ExtractedObject`].
//!
//! Every leaf of an extracted object is text (or an opaque file), so this
//! deserializer coerces on demand: a field typed `u32` parses its text, a field
//! typed `Vec<_>` accepts either a sequence or a single value. Errors carry the
//! path of the value that failed.

use crate::{ExtractedObject, FieldValue, Issue, PathSegment, Scalar, UploadedFile, ValidationError};
use bytes::Bytes;
use serde::de::value::{MapDeserializer, StringDeserializer};
use serde::de::{self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;
use std::collections::VecDeque;
use std::fmt;

/// Deserializes an extracted object into `T`.
///
/// # Errors
///
/// Returns a [`ValidationError`] with a single issue describing the first
/// value that could not be deserialized.
///
/// # Example
///
/// ```rust
/// use paramkit_core::{from_extracted, ExtractedObject, FieldValue, PathSegment};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Query {
///     age: u32,
///     friends: Vec<String>,
/// }
///
/// let mut object = ExtractedObject::new();
/// object.insert("age", "10");
/// object.insert("friends", FieldValue::texts(["a", "b"]));
///
/// let query: Query = from_extracted(object.clone()).unwrap();
/// assert_eq!(query.age, 10);
/// assert_eq!(query.friends, vec!["a", "b"]);
///
/// object.insert("age", "old");
/// let err = from_extracted::<Query>(object).unwrap_err();
/// assert_eq!(err.issues()[0].path, vec![PathSegment::Key("age".into())]);
/// ```
pub fn from_extracted<T: DeserializeOwned>(object: ExtractedObject) -> Result<T, ValidationError> {
    T::deserialize(ObjectDeserializer::new(object)).map_err(Error::into_validation_error)
}

/// Deserialization failure with the path it happened at.
#[derive(Debug)]
pub(crate) struct Error {
    path: VecDeque<PathSegment>,
    message: String,
}

impl Error {
    fn at(mut self, segment: PathSegment) -> Self {
        self.path.push_front(segment);
        self
    }

    fn into_validation_error(self) -> ValidationError {
        ValidationError::from(Issue::new(self.path.into(), self.message))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self {
            path: VecDeque::new(),
            message: msg.to_string(),
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Self {
            path: VecDeque::from([PathSegment::Key(field.to_owned())]),
            message: "Required".to_owned(),
        }
    }
}

/// Deserializes the top-level object as a map.
struct ObjectDeserializer {
    entries: indexmap::map::IntoIter<String, FieldValue>,
    current: Option<(String, FieldValue)>,
}

impl ObjectDeserializer {
    fn new(object: ExtractedObject) -> Self {
        Self {
            entries: object.into_iter(),
            current: None,
        }
    }
}

impl<'de> de::Deserializer<'de> for ObjectDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_map(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de> MapAccess<'de> for ObjectDeserializer {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Error> {
        match self.entries.next() {
            Some((key, value)) => {
                let deserializer: StringDeserializer<Error> = key.clone().into_deserializer();
                self.current = Some((key, value));
                seed.deserialize(deserializer).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        let (key, value) = self
            .current
            .take()
            .ok_or_else(|| <Error as de::Error>::custom("value requested before key"))?;
        seed.deserialize(ValueDeserializer(value))
            .map_err(|e| e.at(PathSegment::Key(key)))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Deserializes one field of the object.
struct ValueDeserializer(FieldValue);

impl ValueDeserializer {
    /// Takes the single text value, or fails naming what was expected.
    fn into_text(self, expected: &str) -> Result<String, Error> {
        match self.0 {
            FieldValue::One(Scalar::Text(text)) => Ok(text),
            FieldValue::One(Scalar::File(_)) => Err(<Error as de::Error>::custom(format!(
                "Expected {expected}, received file"
            ))),
            FieldValue::Many(values) => Err(<Error as de::Error>::custom(format!(
                "Expected {expected}, received {} values",
                values.len()
            ))),
        }
    }

    fn into_seq(self) -> SeqDeserializer {
        let values = match self.0 {
            FieldValue::One(scalar) => vec![scalar],
            FieldValue::Many(values) => values,
        };
        SeqDeserializer {
            values: values.into_iter().enumerate(),
        }
    }
}

macro_rules! deserialize_parsed {
    ($($method:ident => $visit:ident($ty:ty, $expected:literal);)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                let text = self.into_text($expected)?;
                let parsed: $ty = text.parse().map_err(|_| {
                    <Error as de::Error>::custom(format!("Expected {}, received {:?}", $expected, text))
                })?;
                visitor.$visit(parsed)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            FieldValue::One(Scalar::Text(text)) => visitor.visit_string(text),
            FieldValue::One(Scalar::File(file)) => de::Deserializer::deserialize_any(FileDeserializer(file), visitor),
            many @ FieldValue::Many(_) => visitor.visit_seq(ValueDeserializer(many).into_seq()),
        }
    }

    deserialize_parsed! {
        deserialize_bool => visit_bool(bool, "boolean");
        deserialize_i8 => visit_i8(i8, "integer");
        deserialize_i16 => visit_i16(i16, "integer");
        deserialize_i32 => visit_i32(i32, "integer");
        deserialize_i64 => visit_i64(i64, "integer");
        deserialize_i128 => visit_i128(i128, "integer");
        deserialize_u8 => visit_u8(u8, "non-negative integer");
        deserialize_u16 => visit_u16(u16, "non-negative integer");
        deserialize_u32 => visit_u32(u32, "non-negative integer");
        deserialize_u64 => visit_u64(u64, "non-negative integer");
        deserialize_u128 => visit_u128(u128, "non-negative integer");
        deserialize_f32 => visit_f32(f32, "number");
        deserialize_f64 => visit_f64(f64, "number");
        deserialize_char => visit_char(char, "single character");
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.into_text("string")?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.into_text("string")?)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_string(self.into_text("string")?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        // A key that made it into the object always carries a value.
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_seq(self.into_seq())
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_seq(self.into_seq())
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_seq(self.into_seq())
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        let text = self.into_text("one of the allowed values")?;
        let deserializer: StringDeserializer<Error> = text.into_deserializer();
        visitor.visit_enum(deserializer)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf map struct
    }
}

/// Deserializes the values of a multi-valued field, tracking their index.
struct SeqDeserializer {
    values: std::iter::Enumerate<std::vec::IntoIter<Scalar>>,
}

impl<'de> SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>, Error> {
        match self.values.next() {
            Some((index, scalar)) => seed
                .deserialize(ValueDeserializer(FieldValue::One(scalar)))
                .map(Some)
                .map_err(|e| e.at(PathSegment::Index(index))),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

/// Presents an uploaded file as a map of its parts.
struct FileDeserializer(UploadedFile);

impl<'de> de::Deserializer<'de> for FileDeserializer {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        let UploadedFile {
            name,
            file_name,
            content_type,
            data,
        } = self.0;
        let parts = [
            ("name", FilePart::Text(name)),
            ("file_name", FilePart::Text(file_name)),
            ("content_type", FilePart::Text(content_type)),
            ("data", FilePart::Data(data)),
        ];
        let mut map: MapDeserializer<'de, _, Error> = MapDeserializer::new(parts.into_iter());
        let value = visitor.visit_map(&mut map)?;
        map.end()?;
        Ok(value)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

/// One part of an uploaded file.
enum FilePart {
    Text(Option<String>),
    Data(Bytes),
}

impl<'de> IntoDeserializer<'de, Error> for FilePart {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

impl<'de> de::Deserializer<'de> for FilePart {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Self::Text(Some(text)) => visitor.visit_string(text),
            Self::Text(None) => visitor.visit_none(),
            Self::Data(data) => visitor.visit_bytes(&data),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self {
            Self::Text(None) => visitor.visit_none(),
            part => visitor.visit_some(part),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Profile {
        id: String,
        age: u32,
        #[serde(default)]
        friends: Option<Vec<String>>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "lowercase")]
    enum Sort {
        Asc,
        Desc,
    }

    fn object(pairs: &[(&str, FieldValue)]) -> ExtractedObject {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), v.clone()))
            .collect()
    }

    #[test]
    fn test_coerces_numbers() {
        let profile: Profile = from_extracted(object(&[
            ("id", FieldValue::text("id1")),
            ("age", FieldValue::text("10")),
        ]))
        .unwrap();

        assert_eq!(
            profile,
            Profile {
                id: "id1".into(),
                age: 10,
                friends: None,
            }
        );
    }

    #[test]
    fn test_sequence_field() {
        let profile: Profile = from_extracted(object(&[
            ("id", FieldValue::text("id1")),
            ("age", FieldValue::text("10")),
            ("friends", FieldValue::texts(["a", "b"])),
        ]))
        .unwrap();

        assert_eq!(profile.friends, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_single_value_accepted_as_sequence() {
        let profile: Profile = from_extracted(object(&[
            ("id", FieldValue::text("id1")),
            ("age", FieldValue::text("10")),
            ("friends", FieldValue::text("a")),
        ]))
        .unwrap();

        assert_eq!(profile.friends, Some(vec!["a".to_string()]));
    }

    #[test]
    fn test_invalid_number_reports_path() {
        let err = from_extracted::<Profile>(object(&[
            ("id", FieldValue::text("id1")),
            ("age", FieldValue::text("notanumber")),
        ]))
        .unwrap_err();

        let issue = &err.issues()[0];
        assert_eq!(issue.path, vec![PathSegment::Key("age".into())]);
        assert!(issue.message.contains("notanumber"));
    }

    #[test]
    fn test_missing_field_reports_path() {
        let err = from_extracted::<Profile>(object(&[("id", FieldValue::text("id1"))])).unwrap_err();

        let issue = &err.issues()[0];
        assert_eq!(issue.path, vec![PathSegment::Key("age".into())]);
        assert_eq!(issue.message, "Required");
    }

    #[test]
    fn test_sequence_element_reports_index() {
        #[derive(Debug, Deserialize)]
        struct Scores {
            #[allow(dead_code)]
            scores: Vec<u8>,
        }

        let err = from_extracted::<Scores>(object(&[(
            "scores",
            FieldValue::texts(["1", "2", "x"]),
        )]))
        .unwrap_err();

        assert_eq!(
            err.issues()[0].path,
            vec![PathSegment::Key("scores".into()), PathSegment::Index(2)]
        );
    }

    #[test]
    fn test_many_values_for_single_field() {
        let err = from_extracted::<Profile>(object(&[
            ("id", FieldValue::texts(["a", "b"])),
            ("age", FieldValue::text("1")),
        ]))
        .unwrap_err();

        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("id".into())]);
    }

    #[test]
    fn test_enum_and_bool() {
        #[derive(Debug, Deserialize)]
        struct Listing {
            sort: Sort,
            active: bool,
            ratio: f64,
        }

        let listing: Listing = from_extracted(object(&[
            ("sort", FieldValue::text("desc")),
            ("active", FieldValue::text("true")),
            ("ratio", FieldValue::text("0.5")),
        ]))
        .unwrap();

        assert_eq!(listing.sort, Sort::Desc);
        assert!(listing.active);
        assert!((listing.ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_enum_variant() {
        #[derive(Debug, Deserialize)]
        struct Listing {
            #[allow(dead_code)]
            sort: Sort,
        }

        let err = from_extracted::<Listing>(object(&[("sort", FieldValue::text("sideways"))])).unwrap_err();
        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("sort".into())]);
    }

    #[test]
    fn test_map_target_keeps_raw_values() {
        let map: HashMap<String, String> = from_extracted(object(&[
            ("a", FieldValue::text("1")),
            ("b", FieldValue::text("2")),
        ]))
        .unwrap();

        assert_eq!(map.len(), 2);
        assert_eq!(map["b"], "2");
    }

    #[test]
    fn test_file_passthrough() {
        #[derive(Debug, Deserialize)]
        struct Upload {
            avatar: UploadedFile,
        }

        let file = UploadedFile::new(&b"png-bytes"[..])
            .with_name("avatar")
            .with_file_name("me.png")
            .with_content_type("image/png");

        let upload: Upload = from_extracted(object(&[("avatar", FieldValue::from(file.clone()))])).unwrap();
        assert_eq!(upload.avatar, file);
    }

    #[test]
    fn test_file_where_text_expected() {
        let err = from_extracted::<Profile>(object(&[
            ("id", FieldValue::from(UploadedFile::new("x"))),
            ("age", FieldValue::text("1")),
        ]))
        .unwrap_err();

        assert_eq!(err.issues()[0].path, vec![PathSegment::Key("id".into())]);
        assert!(err.issues()[0].message.contains("file"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        #[derive(Debug, Deserialize)]
        struct OnlyId {
            id: String,
        }

        let only: OnlyId = from_extracted(object(&[
            ("id", FieldValue::text("x")),
            ("extra", FieldValue::texts(["1", "2"])),
        ]))
        .unwrap();

        assert_eq!(only.id, "x");
    }
}
