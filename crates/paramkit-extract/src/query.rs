//! Query string sources.
//!
//! Anything that can produce the query string of a request implements
//! [`QuerySource`]. Resolution is synchronous.

use http::{Request, Uri};

use crate::{Entries, ExtractionContext, ExtractionError, ExtractionSource};

/// A value query entries can be read from.
///
/// # Example
///
/// ```rust
/// use http::Uri;
/// use paramkit_extract::QuerySource;
///
/// let uri = Uri::from_static("/users?id=id1&friends=a&friends=b");
/// let entries = uri.query_entries().unwrap();
///
/// assert_eq!(entries.len(), 3);
/// assert_eq!(entries.get_all("friends").count(), 2);
/// ```
pub trait QuerySource {
    /// Reads the query entries in source order.
    fn query_entries(&self) -> Result<Entries, ExtractionError>;
}

/// Parses a raw query string. A leading `?` is ignored.
pub fn parse_query_string(query: &str) -> Result<Entries, ExtractionError> {
    let query = query.strip_prefix('?').unwrap_or(query);
    Entries::parse_urlencoded(query)
        .map_err(|e| ExtractionError::malformed(ExtractionSource::Query, e.to_string()))
}

impl QuerySource for str {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        parse_query_string(self)
    }
}

impl QuerySource for String {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        parse_query_string(self)
    }
}

impl QuerySource for Entries {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        Ok(self.clone())
    }
}

impl QuerySource for Uri {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        parse_query_string(self.query().unwrap_or(""))
    }
}

impl<B> QuerySource for Request<B> {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        self.uri().query_entries()
    }
}

impl QuerySource for ExtractionContext {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        self.uri().query_entries()
    }
}

impl<T: QuerySource + ?Sized> QuerySource for &T {
    fn query_entries(&self) -> Result<Entries, ExtractionError> {
        (**self).query_entries()
    }
}
