//! Normalized request data.
//!
//! An [`ExtractedObject`] is what every request source is reduced to before
//! validation: an insertion-ordered map whose values are either a single
//! [`Scalar`] or an ordered sequence of them.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A file received through a multipart form.
///
/// Files are opaque to extraction: they are stored and handed to the schema
/// exactly as they were read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// The form field name.
    pub name: Option<String>,
    /// The original file name supplied by the client.
    pub file_name: Option<String>,
    /// The Content-Type of the file part.
    pub content_type: Option<String>,
    /// The file contents.
    pub data: Bytes,
}

impl UploadedFile {
    /// Creates a file from its contents, with no metadata.
    #[must_use]
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            name: None,
            file_name: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Sets the form field name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the client file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Sets the Content-Type.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Returns the size of the file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the file is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A single raw value: text, or an opaque uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    /// A text value.
    Text(String),
    /// An uploaded file.
    File(UploadedFile),
}

impl Scalar {
    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::File(_) => None,
        }
    }

    /// Returns the file if this is a file value.
    #[must_use]
    pub fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Self::Text(_) => None,
            Self::File(file) => Some(file),
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for Scalar {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<UploadedFile> for Scalar {
    fn from(file: UploadedFile) -> Self {
        Self::File(file)
    }
}

/// The value stored under one key of an [`ExtractedObject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// The key was seen once.
    One(Scalar),
    /// The key was seen several times, in source order.
    Many(Vec<Scalar>),
}

impl FieldValue {
    /// Creates a single text value.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::One(Scalar::Text(text.into()))
    }

    /// Creates a sequence of text values.
    #[must_use]
    pub fn texts<I, T>(texts: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::Many(texts.into_iter().map(|t| Scalar::Text(t.into())).collect())
    }

    /// Appends another occurrence of this key.
    ///
    /// A single value becomes a two-element sequence; a sequence grows by one.
    pub fn push(&mut self, value: Scalar) {
        match self {
            Self::One(first) => {
                let first = std::mem::take(first);
                *self = Self::Many(vec![first, value]);
            }
            Self::Many(values) => values.push(value),
        }
    }

    /// Returns the text if this is a single text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::One(scalar) => scalar.as_text(),
            Self::Many(_) => None,
        }
    }

    /// Returns true if this holds a sequence.
    #[must_use]
    pub fn is_many(&self) -> bool {
        matches!(self, Self::Many(_))
    }

    /// Returns the number of values held.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(values) => values.len(),
        }
    }

    /// Returns true if this is an empty sequence.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the held values in order.
    pub fn iter(&self) -> impl Iterator<Item = &Scalar> {
        let values: &[Scalar] = match self {
            Self::One(scalar) => std::slice::from_ref(scalar),
            Self::Many(values) => values,
        };
        values.iter()
    }
}

impl From<Scalar> for FieldValue {
    fn from(scalar: Scalar) -> Self {
        Self::One(scalar)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<UploadedFile> for FieldValue {
    fn from(file: UploadedFile) -> Self {
        Self::One(Scalar::File(file))
    }
}

/// Normalized request data, ready for schema validation.
///
/// Keys keep the order in which they were first seen.
///
/// # Example
///
/// ```rust
/// use paramkit_core::{ExtractedObject, FieldValue};
///
/// let mut object = ExtractedObject::new();
/// object.insert("id", "id1");
/// object.insert("friends", FieldValue::texts(["a", "b"]));
///
/// assert_eq!(object.get("id").and_then(FieldValue::as_text), Some("id1"));
/// assert!(object.get("friends").unwrap().is_many());
/// assert_eq!(object.keys().collect::<Vec<_>>(), vec!["id", "friends"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractedObject {
    inner: IndexMap<String, FieldValue>,
}

impl ExtractedObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty object with room for `capacity` keys.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: IndexMap::with_capacity(capacity),
        }
    }

    /// Inserts a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.inner.insert(key.into(), value.into())
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.inner.get(key)
    }

    /// Returns a mutable reference to the value for a key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.inner.get_mut(key)
    }

    /// Removes a key, preserving the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.inner.shift_remove(key)
    }

    /// Returns true if the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Iterates over key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Consumes the object and returns the underlying map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.inner
    }
}

impl From<IndexMap<String, FieldValue>> for ExtractedObject {
    fn from(inner: IndexMap<String, FieldValue>) -> Self {
        Self { inner }
    }
}

impl<K, V> FromIterator<(K, V)> for ExtractedObject
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl IntoIterator for ExtractedObject {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_keeps_order_and_shape() {
        let mut object = ExtractedObject::new();
        object.insert("id", "id1");
        object.insert("friends", FieldValue::texts(["a", "b"]));

        let json = serde_json::to_string(&object).unwrap();
        assert_eq!(json, r#"{"id":"id1","friends":["a","b"]}"#);
    }

    #[test]
    fn test_serialize_file() {
        let mut object = ExtractedObject::new();
        object.insert("doc", UploadedFile::new("ab").with_file_name("a.txt"));

        let json = serde_json::to_value(&object).unwrap();
        assert_eq!(json["doc"]["file_name"], "a.txt");
        assert_eq!(json["doc"]["data"], serde_json::json!([97, 98]));
    }

    #[test]
    fn test_push_promotes_single_to_sequence() {
        let mut value = FieldValue::text("a");
        value.push(Scalar::from("b"));

        assert_eq!(value, FieldValue::texts(["a", "b"]));
    }

    #[test]
    fn test_push_appends_to_sequence() {
        let mut value = FieldValue::texts(["a", "b"]);
        value.push(Scalar::from("c"));

        assert_eq!(value.len(), 3);
        let texts: Vec<_> = value.iter().filter_map(Scalar::as_text).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_field_value_accessors() {
        let one = FieldValue::text("x");
        assert_eq!(one.as_text(), Some("x"));
        assert!(!one.is_many());
        assert_eq!(one.len(), 1);

        let many = FieldValue::texts(["x", "y"]);
        assert_eq!(many.as_text(), None);
        assert!(many.is_many());
        assert!(FieldValue::Many(Vec::new()).is_empty());
    }

    #[test]
    fn test_file_scalar() {
        let file = UploadedFile::new("hello")
            .with_name("avatar")
            .with_file_name("a.txt")
            .with_content_type("text/plain");
        let scalar = Scalar::from(file.clone());

        assert_eq!(scalar.as_file(), Some(&file));
        assert_eq!(scalar.as_text(), None);
        assert_eq!(file.len(), 5);
        assert!(!file.is_empty());
    }

    #[test]
    fn test_object_preserves_insertion_order() {
        let mut object = ExtractedObject::new();
        object.insert("b", "2");
        object.insert("a", "1");
        object.insert("c", "3");

        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["b", "a", "c"]);

        object.remove("a");
        assert_eq!(object.keys().collect::<Vec<_>>(), vec!["b", "c"]);
        assert_eq!(object.len(), 2);
    }

    #[test]
    fn test_object_from_iterator() {
        let object: ExtractedObject = vec![("id", "1"), ("name", "alice")].into_iter().collect();

        assert!(object.contains_key("id"));
        assert_eq!(object.get("name").and_then(FieldValue::as_text), Some("alice"));
        assert!(!object.is_empty());
    }
}
