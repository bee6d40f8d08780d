//! Form body sources.
//!
//! A form body is read once, asynchronously, into [`Entries`]. The
//! Content-Type header selects the decoder:
//!
//! | Content-Type | Decoder |
//! |--------------|---------|
//! | `application/x-www-form-urlencoded` | `serde_urlencoded` |
//! | `multipart/form-data` | `multer` (files become [`Scalar::File`]) |
//! | absent | `serde_urlencoded` |
//! | anything else | rejected with 415 |
//!
//! [`Scalar::File`]: paramkit_core::Scalar::File

use async_trait::async_trait;
use bytes::Bytes;
use http::Request;
use tracing::debug;

use crate::multipart::read_multipart;
use crate::{Entries, ExtractionContext, ExtractionError, ExtractionSource};

/// Default maximum body size for urlencoded forms (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Default maximum body size for multipart forms (50 MB).
pub const DEFAULT_MAX_MULTIPART_SIZE: usize = 50 * 1024 * 1024;

/// Default maximum size per multipart field (10 MB).
pub const DEFAULT_MAX_FIELD_SIZE: usize = 10 * 1024 * 1024;

/// Default maximum number of multipart fields.
pub const DEFAULT_MAX_FIELDS: usize = 100;

const ACCEPTED: &str = "application/x-www-form-urlencoded or multipart/form-data";

/// Limits applied while reading a form body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// Maximum urlencoded body size in bytes.
    pub max_body_size: usize,
    /// Maximum multipart body size in bytes.
    pub max_multipart_size: usize,
    /// Maximum size of a single multipart field in bytes.
    pub max_field_size: usize,
    /// Maximum number of multipart fields.
    pub max_fields: usize,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
            max_multipart_size: DEFAULT_MAX_MULTIPART_SIZE,
            max_field_size: DEFAULT_MAX_FIELD_SIZE,
            max_fields: DEFAULT_MAX_FIELDS,
        }
    }
}

impl FormConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum urlencoded body size.
    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }

    /// Set the maximum multipart body size.
    #[must_use]
    pub fn max_multipart_size(mut self, size: usize) -> Self {
        self.max_multipart_size = size;
        self
    }

    /// Set the maximum field size.
    #[must_use]
    pub fn max_field_size(mut self, size: usize) -> Self {
        self.max_field_size = size;
        self
    }

    /// Set the maximum number of fields.
    #[must_use]
    pub fn max_fields(mut self, count: usize) -> Self {
        self.max_fields = count;
        self
    }
}

/// A value form entries can be read from.
///
/// # Example
///
/// ```rust
/// use paramkit_extract::{ExtractionContext, FormSource};
/// use paramkit_core::Scalar;
///
/// # tokio_test_block(async {
/// let ctx = ExtractionContext::builder()
///     .content_type("application/x-www-form-urlencoded")
///     .body("id=id1&consent=on")
///     .build();
///
/// let entries = ctx.read_entries().await.unwrap();
/// assert_eq!(entries.get("consent").and_then(Scalar::as_text), Some("on"));
/// # });
/// # fn tokio_test_block<F: std::future::Future<Output = ()>>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[async_trait]
pub trait FormSource: Send {
    /// Reads the form entries in source order.
    async fn read_entries(self) -> Result<Entries, ExtractionError>;
}

#[async_trait]
impl FormSource for Entries {
    async fn read_entries(self) -> Result<Entries, ExtractionError> {
        Ok(self)
    }
}

#[async_trait]
impl FormSource for ExtractionContext {
    async fn read_entries(self) -> Result<Entries, ExtractionError> {
        let kind = FormKind::detect(self.content_type())?;
        let config = self.form_config().clone();
        read_form(kind, self.into_body(), &config).await
    }
}

#[async_trait]
impl<'a> FormSource for &'a ExtractionContext {
    async fn read_entries(self) -> Result<Entries, ExtractionError> {
        let kind = FormKind::detect(self.content_type())?;
        read_form(kind, self.body().clone(), self.form_config()).await
    }
}

#[async_trait]
impl FormSource for Request<Bytes> {
    async fn read_entries(self) -> Result<Entries, ExtractionError> {
        ExtractionContext::from(self).read_entries().await
    }
}

/// Body decoder chosen from the Content-Type header.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FormKind {
    UrlEncoded,
    Multipart { boundary: String },
}

impl FormKind {
    fn detect(content_type: Option<&str>) -> Result<Self, ExtractionError> {
        let Some(raw) = content_type else {
            return Ok(Self::UrlEncoded);
        };

        let mime: mime::Mime = raw.parse().map_err(|_| {
            ExtractionError::invalid_content_type(format!("cannot parse '{raw}'"))
        })?;

        if mime.essence_str() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
            return Ok(Self::UrlEncoded);
        }

        if mime.type_() == mime::MULTIPART && mime.subtype() == mime::FORM_DATA {
            let boundary = multer::parse_boundary(raw).map_err(|_| {
                ExtractionError::invalid_content_type(
                    "missing or invalid boundary in multipart Content-Type",
                )
            })?;
            return Ok(Self::Multipart { boundary });
        }

        debug!(content_type = raw, "rejecting form body");
        Err(ExtractionError::unsupported_media_type(ACCEPTED, Some(raw)))
    }
}

async fn read_form(
    kind: FormKind,
    body: Bytes,
    config: &FormConfig,
) -> Result<Entries, ExtractionError> {
    match kind {
        FormKind::UrlEncoded => {
            debug!(bytes = body.len(), "reading urlencoded form");
            read_urlencoded(&body, config)
        }
        FormKind::Multipart { boundary } => {
            debug!(bytes = body.len(), "reading multipart form");
            read_multipart(body, boundary, config).await
        }
    }
}

fn read_urlencoded(body: &[u8], config: &FormConfig) -> Result<Entries, ExtractionError> {
    if body.len() > config.max_body_size {
        debug!(limit = config.max_body_size, actual = body.len(), "form body too large");
        return Err(ExtractionError::payload_too_large(config.max_body_size, body.len()));
    }

    let text = std::str::from_utf8(body).map_err(|e| {
        ExtractionError::malformed(ExtractionSource::Body, format!("invalid UTF-8: {e}"))
    })?;

    Entries::parse_urlencoded(text)
        .map_err(|e| ExtractionError::malformed(ExtractionSource::Body, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;
    use paramkit_core::Scalar;

    fn form_ctx(content_type: Option<&str>, body: &'static str) -> ExtractionContext {
        let builder = ExtractionContext::builder().body(body);
        match content_type {
            Some(ct) => builder.content_type(ct).build(),
            None => builder.build(),
        }
    }

    #[tokio::test]
    async fn test_urlencoded_form() {
        let ctx = form_ctx(
            Some("application/x-www-form-urlencoded"),
            "id=id1&age=10&consent=on",
        );
        let entries = ctx.read_entries().await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries.get("consent").and_then(Scalar::as_text), Some("on"));
    }

    #[tokio::test]
    async fn test_urlencoded_with_charset() {
        let ctx = form_ctx(
            Some("application/x-www-form-urlencoded; charset=UTF-8"),
            "name=hello+world",
        );
        let entries = ctx.read_entries().await.unwrap();
        assert_eq!(entries.get("name").and_then(Scalar::as_text), Some("hello world"));
    }

    #[tokio::test]
    async fn test_missing_content_type_reads_urlencoded() {
        let ctx = form_ctx(None, "a=1&a=2");
        let entries = (&ctx).read_entries().await.unwrap();
        assert_eq!(entries.get_all("a").count(), 2);
    }

    #[tokio::test]
    async fn test_empty_body() {
        let ctx = form_ctx(Some("application/x-www-form-urlencoded"), "");
        assert!(ctx.read_entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let ctx = form_ctx(Some("application/json"), r#"{"a":1}"#);
        let err = ctx.read_entries().await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(err.extraction_source(), ExtractionSource::ContentType);
    }

    #[tokio::test]
    async fn test_unparseable_content_type() {
        let ctx = form_ctx(Some("not a mime"), "a=1");
        let err = ctx.read_entries().await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_multipart_without_boundary() {
        let ctx = form_ctx(Some("multipart/form-data"), "");
        let err = ctx.read_entries().await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONTENT_TYPE");
    }

    #[tokio::test]
    async fn test_body_too_large() {
        let ctx = ExtractionContext::builder()
            .body("field=0123456789")
            .form_config(FormConfig::new().max_body_size(8))
            .build();
        let err = ctx.read_entries().await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let ctx = ExtractionContext::builder()
            .body(Bytes::from_static(&[b'a', b'=', 0xff, 0xfe]))
            .build();
        let err = ctx.read_entries().await.unwrap_err();

        assert_eq!(err.error_code(), "MALFORMED_REQUEST");
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
    }

    #[tokio::test]
    async fn test_entries_pass_through() {
        let entries: Entries = vec![("x", "1")].into_iter().collect();
        assert_eq!(entries.clone().read_entries().await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_request_source() {
        let request = Request::builder()
            .method("POST")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Bytes::from_static(b"q=1"))
            .unwrap();
        let entries = request.read_entries().await.unwrap();
        assert_eq!(entries.get("q").and_then(Scalar::as_text), Some("1"));
    }

    #[test]
    fn test_config_builder() {
        let config = FormConfig::new()
            .max_body_size(1)
            .max_multipart_size(2)
            .max_field_size(3)
            .max_fields(4);

        assert_eq!(config.max_body_size, 1);
        assert_eq!(config.max_multipart_size, 2);
        assert_eq!(config.max_field_size, 3);
        assert_eq!(config.max_fields, 4);
        assert_eq!(FormConfig::default().max_fields, DEFAULT_MAX_FIELDS);
    }
}
