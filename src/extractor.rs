//! Locating the client_id of a request.
//!
//! Sources are consulted in a fixed order and the first hit wins:
//!
//! 1. HTTP Basic-Auth with a non-empty username
//! 2. `Authorization: Bearer <id>.<opaque>`; a malformed token is an error
//!    and later sources are not consulted
//! 3. For POST, PUT and PATCH: a URL-encoded form body (plus the URL query)
//! 4. For every other method: the URL query string
//!
//! Reading a form body consumes the stream, so the extractor buffers it and
//! puts an identical copy back before returning, on success and failure
//! alike. The decoded form is cached in the request extensions as
//! [`ParsedForm`].

use std::fmt;

use http::{header, HeaderMap, Method, Request, Uri};
use mime::Mime;

use crate::body::Body;
use crate::credentials::{authorization, basic_auth, parse_bearer_token, BEARER_PREFIX};
use crate::error::{Error, FormLocation};
use crate::form::{Form, ParsedForm};
use crate::source::ClientIdSource;

/// Form and query key holding the client_id unless configured otherwise.
pub const DEFAULT_FIELD_NAME: &str = "client_id";

/// Largest form body buffered unless configured otherwise (10 MiB).
pub const DEFAULT_MAX_FORM_BYTES: usize = 10 << 20;

/// A client_id together with the request location it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId {
    value: String,
    source: ClientIdSource,
}

impl ClientId {
    fn new(value: String, source: ClientIdSource) -> Self {
        Self { value, source }
    }

    /// Returns the client_id.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns where the client_id was found.
    pub fn source(&self) -> ClientIdSource {
        self.source
    }

    /// Consumes the value and returns the client_id.
    pub fn into_string(self) -> String {
        self.value
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Extracts client_ids from requests.
///
/// # Examples
///
/// ```
/// use client_id::{Body, ClientIdExtractor, ClientIdSource};
/// use http::Request;
///
/// let extractor = ClientIdExtractor::new().with_max_form_bytes(64 * 1024);
///
/// let mut req = Request::post("https://example.com/token")
///     .header("Content-Type", "application/x-www-form-urlencoded")
///     .body(Body::from("grant_type=client_credentials&client_id=robbie"))
///     .unwrap();
///
/// let client_id = extractor.extract(Some(&mut req)).unwrap();
/// assert_eq!(client_id.as_str(), "robbie");
/// assert_eq!(client_id.source(), ClientIdSource::FormBody);
///
/// // The body is still there for the handler.
/// let body = req.body_mut().read_all().unwrap();
/// assert_eq!(&body[..], b"grant_type=client_credentials&client_id=robbie");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdExtractor {
    field_name: String,
    max_form_bytes: usize,
}

impl ClientIdExtractor {
    /// Creates an extractor looking for `client_id` in bodies up to 10 MiB.
    pub fn new() -> Self {
        Self {
            field_name: DEFAULT_FIELD_NAME.to_string(),
            max_form_bytes: DEFAULT_MAX_FORM_BYTES,
        }
    }

    /// Sets the form and query key to look up.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Sets the largest form body, in bytes, that will be buffered.
    pub fn with_max_form_bytes(mut self, max_form_bytes: usize) -> Self {
        self.max_form_bytes = max_form_bytes;
        self
    }

    /// Returns the form and query key looked up.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Returns the form body buffering limit in bytes.
    pub fn max_form_bytes(&self) -> usize {
        self.max_form_bytes
    }

    /// Locates the client_id of `req`.
    ///
    /// # Errors
    ///
    /// - [`Error::NilRequest`] if `req` is `None`
    /// - [`Error::InvalidBearerToken`] if a Bearer token is present but malformed
    /// - [`Error::ReadBody`], [`Error::BodyTooLarge`] or [`Error::ParseForm`]
    ///   if the form body or query cannot be read
    /// - [`Error::MissingClientId`] if no source carries a non-empty client_id
    pub fn extract(&self, req: Option<&mut Request<Body>>) -> Result<ClientId, Error> {
        let req = req.ok_or(Error::NilRequest)?;

        if let Some(creds) = basic_auth(req.headers()) {
            if !creds.username.is_empty() {
                return Ok(resolved(creds.username, ClientIdSource::BasicAuth));
            }
        }

        let bearer = authorization(req.headers())
            .and_then(|auth| auth.strip_prefix(BEARER_PREFIX.as_bytes()));
        if let Some(token) = bearer {
            return match parse_bearer_token(&String::from_utf8_lossy(token)) {
                Ok(client_id) => Ok(resolved(client_id, ClientIdSource::BearerToken)),
                Err(err) => {
                    tracing::warn!(method = %req.method(), "rejected malformed bearer token");
                    Err(err)
                }
            };
        }

        self.ensure_form(req)?;

        req.extensions()
            .get::<ParsedForm>()
            .and_then(|parsed| parsed.get(&self.field_name))
            .filter(|(client_id, _)| !client_id.is_empty())
            .map(|(client_id, source)| resolved(client_id.to_string(), source))
            .ok_or(Error::MissingClientId)
    }

    /// Decodes the request form into the extensions unless already cached.
    fn ensure_form(&self, req: &mut Request<Body>) -> Result<(), Error> {
        if req.extensions().get::<ParsedForm>().is_some() {
            return Ok(());
        }

        // A form request reports any parse failure, query included, as a
        // body failure.
        let parsed = if has_body_semantics(req.method()) {
            if is_form_content(req.headers()) && req.body().is_present() {
                let body = self.read_form_body(req.body_mut())?;
                let query = query_form(req.uri(), FormLocation::Body)?;
                ParsedForm { body, query }
            } else {
                ParsedForm::default()
            }
        } else {
            ParsedForm {
                body: Form::new(),
                query: query_form(req.uri(), FormLocation::Url)?,
            }
        };

        req.extensions_mut().insert(parsed);
        Ok(())
    }

    fn read_form_body(&self, body: &mut Body) -> Result<Form, Error> {
        let bytes = body.buffer(self.max_form_bytes).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to buffer form body");
        })?;
        tracing::debug!(len = bytes.len(), "buffered form body");

        Form::parse(&bytes).map_err(|err| {
            tracing::warn!(error = %err, "malformed form body");
            Error::parse_form(FormLocation::Body, err)
        })
    }
}

impl Default for ClientIdExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Locates the client_id of `req` with the default [`ClientIdExtractor`].
///
/// # Errors
///
/// See [`ClientIdExtractor::extract`].
///
/// # Examples
///
/// ```
/// use client_id::{extract_client_id, Body, Error};
/// use http::Request;
///
/// let mut req = Request::get("https://example.com/?client_id=robbie")
///     .body(Body::empty())
///     .unwrap();
/// assert_eq!(extract_client_id(Some(&mut req)).unwrap(), "robbie");
///
/// assert!(matches!(extract_client_id(None), Err(Error::NilRequest)));
/// ```
pub fn extract_client_id(req: Option<&mut Request<Body>>) -> Result<String, Error> {
    ClientIdExtractor::new()
        .extract(req)
        .map(ClientId::into_string)
}

/// Request types a client_id can be extracted from.
pub trait ExtractClientId {
    /// Locates the client_id with the default [`ClientIdExtractor`].
    fn client_id(&mut self) -> Result<String, Error>;
}

impl ExtractClientId for Request<Body> {
    fn client_id(&mut self) -> Result<String, Error> {
        extract_client_id(Some(self))
    }
}

fn resolved(value: String, source: ClientIdSource) -> ClientId {
    tracing::debug!(%source, client_id = %value, "resolved client_id");
    ClientId::new(value, source)
}

fn has_body_semantics(method: &Method) -> bool {
    matches!(method, &Method::POST | &Method::PUT | &Method::PATCH)
}

fn is_form_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<Mime>().ok())
        .is_some_and(|m| {
            m.essence_str()
                .eq_ignore_ascii_case(mime::APPLICATION_WWW_FORM_URLENCODED.essence_str())
        })
}

fn query_form(uri: &Uri, location: FormLocation) -> Result<Form, Error> {
    Form::parse(uri.query().unwrap_or_default().as_bytes())
        .map_err(|err| Error::parse_form(location, err))
}
