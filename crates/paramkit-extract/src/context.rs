//! Request-like extraction context.
//!
//! The [`ExtractionContext`] bundles the parts of an HTTP request that
//! parameter extraction reads: the URI (query string), headers (Content-Type),
//! the buffered body, the matched route parameters, and the form limits.

use bytes::Bytes;
use http::{header, HeaderMap, Method, Request, Uri};

use crate::{FormConfig, RouteParams};

/// Context providing access to the request data that parameters come from.
///
/// # Example
///
/// ```rust
/// use paramkit_extract::{ExtractionContext, RouteParams};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = RouteParams::new();
/// params.push("id", "123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/users/123?tab=posts"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.method(), &Method::GET);
/// assert_eq!(ctx.query_string(), Some("tab=posts"));
/// assert_eq!(ctx.path_params().get("id"), Some("123"));
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: RouteParams,
    form_config: FormConfig,
}

impl ExtractionContext {
    /// Creates a new extraction context with default form limits.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: RouteParams,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            form_config: FormConfig::default(),
        }
    }

    /// Creates a context builder.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Replaces the form limits.
    #[must_use]
    pub fn with_form_config(mut self, config: FormConfig) -> Self {
        self.form_config = config;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Consumes the context and returns the body.
    #[must_use]
    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Returns the matched route parameters.
    #[must_use]
    pub fn path_params(&self) -> &RouteParams {
        &self.path_params
    }

    /// Returns the form limits.
    #[must_use]
    pub fn form_config(&self) -> &FormConfig {
        &self.form_config
    }

    /// Returns a specific header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }
}

/// Builds a context from a buffered request.
///
/// Route parameters are taken from the request extensions when a router
/// stored a [`RouteParams`] there.
impl From<Request<Bytes>> for ExtractionContext {
    fn from(request: Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        let path_params = parts
            .extensions
            .get::<RouteParams>()
            .cloned()
            .unwrap_or_default();
        Self::new(parts.method, parts.uri, parts.headers, body, path_params)
    }
}

/// Builder for constructing an [`ExtractionContext`].
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: RouteParams,
    form_config: FormConfig,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Values that are not valid header text are ignored.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the Content-Type header.
    #[must_use]
    pub fn content_type(self, value: &str) -> Self {
        self.header("content-type", value)
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the route parameters.
    #[must_use]
    pub fn path_params(mut self, params: RouteParams) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single route parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Sets the form limits.
    #[must_use]
    pub fn form_config(mut self, config: FormConfig) -> Self {
        self.form_config = config;
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        ExtractionContext {
            method: self.method.unwrap_or_default(),
            uri: self.uri.unwrap_or_default(),
            headers: self.headers,
            body: self.body,
            path_params: self.path_params,
            form_config: self.form_config,
        }
    }
}
