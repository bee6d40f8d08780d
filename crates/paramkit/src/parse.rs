//! Public entry points.
//!
//! Each source has a throwing and a safe variant. Both run extraction (the
//! default strategy or the caller's parser) and then validation:
//!
//! | Variant | Extraction failure | Validation failure |
//! |---------|--------------------|--------------------|
//! | `parse_*` | `Err(ParseError::Extraction)` | `Err(ParseError::Validation)` |
//! | `parse_*_safe` | `Err(ExtractionError)` | `Ok(ValidationOutcome::Failure)` |
//!
//! Route parameters and query strings resolve synchronously, so their entry
//! points return a [`Deferred`] that is ready whenever the schema is. Form
//! bodies are read asynchronously.

use paramkit_core::{Deferred, Schema, ValidationOutcome};
use paramkit_extract::{Entries, ExtractionError, FormSource, Options, QuerySource, RouteParams};
use tracing::debug;

use crate::{validate, validate_safe, ParseError};

/// Parses route parameters.
///
/// # Example
///
/// ```rust
/// use paramkit::{parse_params, typed, Options, RouteParams};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize, PartialEq)]
/// struct UserPath {
///     id: String,
///     age: u32,
/// }
///
/// let params: RouteParams = vec![("id", "id1"), ("age", "10")].into_iter().collect();
/// let schema = typed::<UserPath>();
///
/// let user = parse_params(&params, &schema, &Options::default())
///     .into_ready()
///     .ok()
///     .unwrap()
///     .unwrap();
/// assert_eq!(user, UserPath { id: "id1".into(), age: 10 });
/// ```
pub fn parse_params<'a, S>(
    params: &RouteParams,
    schema: &'a S,
    options: &Options<RouteParams>,
) -> Deferred<'a, Result<S::Output, ParseError>>
where
    S: Schema + ?Sized,
    S::Output: 'a,
{
    match options.extract(params) {
        Ok(extracted) => validate(extracted, schema),
        Err(err) => Deferred::ready(Err(extraction_failed(err))),
    }
}

/// Parses route parameters, reporting validation failure as a value.
pub fn parse_params_safe<'a, S>(
    params: &RouteParams,
    schema: &'a S,
    options: &Options<RouteParams>,
) -> Deferred<'a, Result<ValidationOutcome<S::Output>, ExtractionError>>
where
    S: Schema + ?Sized,
    S::Output: 'a,
{
    match options.extract(params) {
        Ok(extracted) => validate_safe(extracted, schema).map(Ok),
        Err(err) => Deferred::ready(Err(err)),
    }
}

/// Parses a query string.
///
/// `source` can be a raw query string, an [`http::Uri`], an
/// [`http::Request`], an [`ExtractionContext`](paramkit_extract::ExtractionContext),
/// or already parsed [`Entries`].
///
/// # Example
///
/// ```rust
/// use paramkit::{parse_query, typed, Options};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Search {
///     id: String,
///     friends: Vec<String>,
/// }
///
/// let uri: http::Uri = "/users?id=id1&friends=a&friends=b".parse().unwrap();
/// let schema = typed::<Search>();
///
/// let search = parse_query(&uri, &schema, &Options::default())
///     .into_ready()
///     .ok()
///     .unwrap()
///     .unwrap();
/// assert_eq!(search.friends, vec!["a", "b"]);
/// ```
pub fn parse_query<'a, Q, S>(
    source: &Q,
    schema: &'a S,
    options: &Options<Entries>,
) -> Deferred<'a, Result<S::Output, ParseError>>
where
    Q: QuerySource + ?Sized,
    S: Schema + ?Sized,
    S::Output: 'a,
{
    match source.query_entries().and_then(|entries| options.extract(&entries)) {
        Ok(extracted) => validate(extracted, schema),
        Err(err) => Deferred::ready(Err(extraction_failed(err))),
    }
}

/// Parses a query string, reporting validation failure as a value.
pub fn parse_query_safe<'a, Q, S>(
    source: &Q,
    schema: &'a S,
    options: &Options<Entries>,
) -> Deferred<'a, Result<ValidationOutcome<S::Output>, ExtractionError>>
where
    Q: QuerySource + ?Sized,
    S: Schema + ?Sized,
    S::Output: 'a,
{
    match source.query_entries().and_then(|entries| options.extract(&entries)) {
        Ok(extracted) => validate_safe(extracted, schema).map(Ok),
        Err(err) => Deferred::ready(Err(err)),
    }
}

/// Parses a form body.
///
/// The body is read once; urlencoded and multipart bodies are supported and
/// uploaded files reach the schema untouched.
///
/// # Example
///
/// ```rust
/// use paramkit::{coerce, parse_form, typed, ExtractionContext, Options};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Signup {
///     id: String,
///     age: u32,
///     #[serde(default, deserialize_with = "coerce::checkbox")]
///     consent: bool,
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let ctx = ExtractionContext::builder()
///     .content_type("application/x-www-form-urlencoded")
///     .body("id=id1&age=10&consent=on")
///     .build();
///
/// let signup = parse_form(ctx, &typed::<Signup>(), &Options::default()).await.unwrap();
/// assert!(signup.consent);
/// # });
/// ```
pub async fn parse_form<'a, F, S>(
    source: F,
    schema: &'a S,
    options: &Options<Entries>,
) -> Result<S::Output, ParseError>
where
    F: FormSource,
    S: Schema + ?Sized,
    S::Output: 'a,
{
    let entries = source.read_entries().await.map_err(extraction_failed)?;
    let extracted = options.extract(&entries).map_err(extraction_failed)?;
    validate(extracted, schema).await
}

/// Parses a form body, reporting validation failure as a value.
pub async fn parse_form_safe<'a, F, S>(
    source: F,
    schema: &'a S,
    options: &Options<Entries>,
) -> Result<ValidationOutcome<S::Output>, ExtractionError>
where
    F: FormSource,
    S: Schema + ?Sized,
    S::Output: 'a,
{
    let entries = source.read_entries().await?;
    let extracted = options.extract(&entries)?;
    Ok(validate_safe(extracted, schema).await)
}

fn extraction_failed(err: ExtractionError) -> ParseError {
    debug!(source = %err.extraction_source(), code = err.error_code(), "extraction failed");
    ParseError::Extraction(err)
}
