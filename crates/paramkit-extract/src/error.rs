//! Extraction error types.
//!
//! This module provides the error type for failures that happen before a
//! schema ever sees the data: unreadable bodies, unsupported content types,
//! exceeded limits, and errors raised by custom parsers.

use http::StatusCode;
use std::error::Error as StdError;
use std::fmt;

/// Source of extraction (where data was being extracted from).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Route parameters (e.g., `/users/{id}`)
    Path,
    /// Query string parameters
    Query,
    /// Form body (urlencoded or multipart)
    Body,
    /// Content-Type header specifically
    ContentType,
    /// Other sources
    Other,
}

impl fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Body => write!(f, "body"),
            Self::ContentType => write!(f, "content-type"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Error that occurs during extraction.
///
/// Contains information about the source of the error and what went wrong.
/// Can be converted to an appropriate HTTP status code for error responses.
///
/// # Example
///
/// ```rust
/// use paramkit_extract::{ExtractionError, ExtractionSource};
/// use http::StatusCode;
///
/// let err = ExtractionError::malformed(ExtractionSource::Body, "invalid UTF-8");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.extraction_source(), ExtractionSource::Body);
/// assert!(err.to_string().contains("invalid UTF-8"));
/// ```
#[derive(Debug)]
pub struct ExtractionError {
    extraction_source: ExtractionSource,
    kind: ExtractionErrorKind,
    message: String,
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    /// Source data could not be decoded
    Malformed,
    /// Body is too large
    PayloadTooLarge,
    /// Too many multipart fields
    TooManyFields,
    /// Content-Type is unsupported
    UnsupportedMediaType,
    /// Content-Type is present but unusable
    InvalidContentType,
    /// Raised by a custom parser
    Parser,
}

impl ExtractionError {
    /// Creates an error for source data that could not be decoded.
    #[must_use]
    pub fn malformed(source: ExtractionSource, details: impl Into<String>) -> Self {
        let details = details.into();
        Self::new(
            source,
            ExtractionErrorKind::Malformed,
            format!("failed to read {source}: {details}"),
        )
    }

    /// Creates an error for a payload that's too large.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self::new(
            ExtractionSource::Body,
            ExtractionErrorKind::PayloadTooLarge,
            format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        )
    }

    /// Creates an error for a multipart body with too many fields.
    #[must_use]
    pub fn too_many_fields(max_fields: usize) -> Self {
        Self::new(
            ExtractionSource::Body,
            ExtractionErrorKind::TooManyFields,
            format!("too many form fields (max {max_fields})"),
        )
    }

    /// Creates an error for unsupported content type.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual_str = actual.unwrap_or("none");
        Self::new(
            ExtractionSource::ContentType,
            ExtractionErrorKind::UnsupportedMediaType,
            format!("unsupported content type: expected {expected}, got '{actual_str}'"),
        )
    }

    /// Creates an error for a Content-Type header that cannot be used.
    #[must_use]
    pub fn invalid_content_type(details: impl Into<String>) -> Self {
        Self::new(
            ExtractionSource::ContentType,
            ExtractionErrorKind::InvalidContentType,
            format!("invalid content type: {}", details.into()),
        )
    }

    /// Creates an error for a custom parser failure.
    ///
    /// The underlying error stays reachable through
    /// [`std::error::Error::source`] and [`ExtractionError::cause`].
    ///
    /// ```rust
    /// use paramkit_extract::{ExtractionError, ExtractionSource};
    ///
    /// let parse_err = "x".parse::<u8>().unwrap_err();
    /// let err = ExtractionError::parser(ExtractionSource::Query, parse_err);
    ///
    /// assert!(err.is_parser_error());
    /// assert!(err.cause().unwrap().downcast_ref::<std::num::ParseIntError>().is_some());
    /// ```
    #[must_use]
    pub fn parser(source: ExtractionSource, error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        let cause = error.into();
        let mut err = Self::new(
            source,
            ExtractionErrorKind::Parser,
            format!("custom {source} parser failed: {cause}"),
        );
        err.cause = Some(cause);
        err
    }

    fn new(source: ExtractionSource, kind: ExtractionErrorKind, message: String) -> Self {
        Self {
            extraction_source: source,
            kind,
            message,
            cause: None,
        }
    }

    /// Returns the extraction source.
    #[must_use]
    pub fn extraction_source(&self) -> ExtractionSource {
        self.extraction_source
    }

    /// Returns the error raised by a custom parser, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Returns true if a custom parser raised this error.
    #[must_use]
    pub fn is_parser_error(&self) -> bool {
        self.kind == ExtractionErrorKind::Parser
    }

    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::Malformed => StatusCode::BAD_REQUEST,
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::TooManyFields => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ExtractionErrorKind::InvalidContentType => StatusCode::BAD_REQUEST,
            ExtractionErrorKind::Parser => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::Malformed => "MALFORMED_REQUEST",
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::TooManyFields => "TOO_MANY_FIELDS",
            ExtractionErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            ExtractionErrorKind::InvalidContentType => "INVALID_CONTENT_TYPE",
            ExtractionErrorKind::Parser => "PARSER_FAILED",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for ExtractionError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_error() {
        let err = ExtractionError::malformed(ExtractionSource::Query, "bad escape");

        assert_eq!(err.extraction_source(), ExtractionSource::Query);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MALFORMED_REQUEST");
        assert!(err.to_string().contains("query"));
        assert!(err.to_string().contains("bad escape"));
        assert!(!err.is_parser_error());
    }

    #[test]
    fn test_payload_too_large_error() {
        let err = ExtractionError::payload_too_large(1024, 2048);

        assert_eq!(err.extraction_source(), ExtractionSource::Body);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(err.to_string().contains("1024"));
        assert!(err.to_string().contains("2048"));
    }

    #[test]
    fn test_too_many_fields_error() {
        let err = ExtractionError::too_many_fields(3);

        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "TOO_MANY_FIELDS");
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_unsupported_media_type_error() {
        let err = ExtractionError::unsupported_media_type("a form body", Some("application/json"));

        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.error_code(), "UNSUPPORTED_MEDIA_TYPE");
        assert!(err.to_string().contains("application/json"));
    }

    #[test]
    fn test_invalid_content_type_error() {
        let err = ExtractionError::invalid_content_type("missing boundary");

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "INVALID_CONTENT_TYPE");
    }

    #[test]
    fn test_parser_error_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad upload");
        let err = ExtractionError::parser(ExtractionSource::Body, io);

        assert!(err.is_parser_error());
        assert_eq!(err.error_code(), "PARSER_FAILED");
        assert!(err.to_string().contains("bad upload"));

        let source = StdError::source(&err).unwrap();
        assert_eq!(source.to_string(), "bad upload");
        assert!(err.cause().unwrap().downcast_ref::<std::io::Error>().is_some());
    }

    #[test]
    fn test_parser_error_from_message() {
        let err = ExtractionError::parser(ExtractionSource::Query, "tags[] must not repeat");
        assert_eq!(err.cause().unwrap().to_string(), "tags[] must not repeat");
    }

    #[test]
    fn test_extraction_source_display() {
        assert_eq!(ExtractionSource::Path.to_string(), "path");
        assert_eq!(ExtractionSource::Query.to_string(), "query");
        assert_eq!(ExtractionSource::Body.to_string(), "body");
        assert_eq!(ExtractionSource::ContentType.to_string(), "content-type");
        assert_eq!(ExtractionSource::Other.to_string(), "other");
    }
}
