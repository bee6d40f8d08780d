//! `multipart/form-data` reading.
//!
//! Text fields become [`Scalar::Text`] entries. Fields that carry a file name
//! become [`Scalar::File`] entries holding an [`UploadedFile`] exactly as
//! received.

use bytes::Bytes;
use paramkit_core::{Scalar, UploadedFile};
use std::io;
use tracing::{debug, trace};

use crate::{Entries, ExtractionError, ExtractionSource, FormConfig};

/// Reads every field of a buffered multipart body, in order.
pub(crate) async fn read_multipart(
    body: Bytes,
    boundary: String,
    config: &FormConfig,
) -> Result<Entries, ExtractionError> {
    if body.len() > config.max_multipart_size {
        debug!(limit = config.max_multipart_size, actual = body.len(), "multipart body too large");
        return Err(ExtractionError::payload_too_large(
            config.max_multipart_size,
            body.len(),
        ));
    }

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut entries = Entries::new();
    let mut field_count = 0;
    let mut file_count = 0;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        if field_count >= config.max_fields {
            debug!(limit = config.max_fields, "too many multipart fields");
            return Err(ExtractionError::too_many_fields(config.max_fields));
        }
        field_count += 1;

        let Some(name) = field.name().map(str::to_owned) else {
            trace!("skipping unnamed multipart field");
            continue;
        };
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(ToString::to_string);

        let data = field.bytes().await.map_err(malformed)?;
        if data.len() > config.max_field_size {
            debug!(field = %name, limit = config.max_field_size, "multipart field too large");
            return Err(ExtractionError::payload_too_large(
                config.max_field_size,
                data.len(),
            ));
        }

        let value = match file_name {
            Some(file_name) => {
                file_count += 1;
                let mut file = UploadedFile::new(data)
                    .with_name(name.clone())
                    .with_file_name(file_name);
                if let Some(content_type) = content_type {
                    file = file.with_content_type(content_type);
                }
                Scalar::File(file)
            }
            None => Scalar::Text(String::from_utf8(data.to_vec()).map_err(|e| {
                ExtractionError::malformed(
                    ExtractionSource::Body,
                    format!("field '{name}' is not valid UTF-8: {e}"),
                )
            })?),
        };
        entries.push(name, value);
    }

    debug!(fields = field_count, files = file_count, "read multipart form");
    Ok(entries)
}

fn malformed(err: multer::Error) -> ExtractionError {
    ExtractionError::malformed(ExtractionSource::Body, format!("multipart parse error: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtractionContext, FormSource};
    use http::StatusCode;

    const BOUNDARY: &str = "----WebKitFormBoundary";

    fn create_multipart_body(parts: &[(&str, &str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();

        for (name, content_type, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());

            if let Some(fname) = filename {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{fname}\"\r\n"
                    )
                    .as_bytes(),
                );
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
                );
            }

            body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }

        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn multipart_ctx(body: Vec<u8>, config: FormConfig) -> ExtractionContext {
        ExtractionContext::builder()
            .content_type(&format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(body)
            .form_config(config)
            .build()
    }

    #[tokio::test]
    async fn test_multipart_text_fields() {
        let body = create_multipart_body(&[
            ("id", "text/plain", None, b"id1"),
            ("friends", "text/plain", None, b"a"),
            ("friends", "text/plain", None, b"b"),
        ]);

        let entries = multipart_ctx(body, FormConfig::default())
            .read_entries()
            .await
            .unwrap();

        let pairs: Vec<_> = entries
            .iter()
            .map(|(k, v)| (k, v.as_text().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("id", "id1"), ("friends", "a"), ("friends", "b")]);
    }

    #[tokio::test]
    async fn test_multipart_file_passthrough() {
        let body = create_multipart_body(&[
            ("name", "text/plain", None, b"Alice"),
            ("photo", "image/png", Some("photo.png"), b"PNG_DATA"),
        ]);

        let entries = multipart_ctx(body, FormConfig::default())
            .read_entries()
            .await
            .unwrap();

        assert_eq!(entries.get("name").and_then(Scalar::as_text), Some("Alice"));

        let file = entries.get("photo").and_then(Scalar::as_file).unwrap();
        assert_eq!(file.name.as_deref(), Some("photo"));
        assert_eq!(file.file_name.as_deref(), Some("photo.png"));
        assert_eq!(file.content_type.as_deref(), Some("image/png"));
        assert_eq!(&file.data[..], b"PNG_DATA");
    }

    #[tokio::test]
    async fn test_multipart_body_too_large() {
        let body = create_multipart_body(&[("a", "text/plain", None, b"0123456789")]);

        let err = multipart_ctx(body, FormConfig::new().max_multipart_size(10))
            .read_entries()
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_multipart_field_too_large() {
        let body = create_multipart_body(&[("upload", "text/plain", Some("big.txt"), &[b'x'; 64])]);

        let err = multipart_ctx(body, FormConfig::new().max_field_size(16))
            .read_entries()
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn test_multipart_too_many_fields() {
        let body = create_multipart_body(&[
            ("f1", "text/plain", None, b"1"),
            ("f2", "text/plain", None, b"2"),
            ("f3", "text/plain", None, b"3"),
        ]);

        let err = multipart_ctx(body, FormConfig::new().max_fields(2))
            .read_entries()
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "TOO_MANY_FIELDS");
    }

    #[tokio::test]
    async fn test_multipart_malformed_body() {
        let err = multipart_ctx(b"garbage".to_vec(), FormConfig::default())
            .read_entries()
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.extraction_source(), ExtractionSource::Body);
    }

    #[tokio::test]
    async fn test_multipart_text_must_be_utf8() {
        let body = create_multipart_body(&[("bad", "text/plain", None, &[0xff, 0xfe])]);

        let err = multipart_ctx(body, FormConfig::default())
            .read_entries()
            .await
            .unwrap_err();

        assert!(err.to_string().contains("bad"));
    }
}
