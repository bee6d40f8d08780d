//! Ordered, multi-valued key/value entries.
//!
//! [`Entries`] is the common shape of a parsed query string and a parsed form
//! body: a list of pairs in source order where a key may repeat.

use paramkit_core::{Scalar, UploadedFile};

/// Parsed query string or form body.
///
/// # Example
///
/// ```rust
/// use paramkit_extract::Entries;
///
/// let entries = Entries::parse_urlencoded("id=id1&friends=a&friends=b").unwrap();
///
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries.get("id").and_then(|v| v.as_text()), Some("id1"));
/// let friends: Vec<_> = entries.get_all("friends").filter_map(|v| v.as_text()).collect();
/// assert_eq!(friends, vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entries {
    inner: Vec<(String, Scalar)>,
}

impl Entries {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with the given capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Vec::with_capacity(capacity),
        }
    }

    /// Parses `application/x-www-form-urlencoded` text.
    ///
    /// Keys and values are percent-decoded and `+` reads as a space.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the input cannot be decoded.
    pub fn parse_urlencoded(input: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(input)?;
        Ok(pairs.into_iter().collect())
    }

    /// Appends a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        self.inner.push((key.into(), value.into()));
    }

    /// Appends an uploaded file.
    pub fn push_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.inner.push((key.into(), Scalar::File(file)));
    }

    /// Returns the first value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.inner.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Returns every value for a key, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Scalar> + 'a {
        self.inner
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the pairs in source order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for Entries {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Scalar>> Extend<(K, V)> for Entries {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.inner
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl IntoIterator for Entries {
    type Item = (String, Scalar);
    type IntoIter = std::vec::IntoIter<(String, Scalar)>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}
