//! Error type for the throwing entry points.

use http::StatusCode;
use paramkit_core::ValidationError;
use paramkit_extract::ExtractionError;
use thiserror::Error;

/// Result type alias using [`ParseError`].
pub type ParseResult<T> = Result<T, ParseError>;

/// Failure of a throwing parse.
///
/// Both variants are transparent: the message and `source()` are those of
/// the wrapped error.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source could not be turned into an extracted object.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The schema rejected the extracted object.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ParseError {
    /// Returns the validation error, if the schema rejected the input.
    #[must_use]
    pub fn validation_error(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Extraction(_) => None,
        }
    }

    /// Returns the extraction error, if the input could not be read.
    #[must_use]
    pub fn extraction_error(&self) -> Option<&ExtractionError> {
        match self {
            Self::Extraction(err) => Some(err),
            Self::Validation(_) => None,
        }
    }

    /// Returns true if the schema rejected the input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the HTTP status code this error maps to.
    ///
    /// Validation failures map to 400; extraction failures use their own code.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Extraction(err) => err.status_code(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the error code suitable for error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Extraction(err) => err.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
