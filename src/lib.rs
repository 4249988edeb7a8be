//! Locate the `client_id` of an inbound HTTP request.
//!
//! Callers identify themselves in several conventional places. This crate
//! checks them in a fixed order and returns the first hit:
//!
//! 1. **Basic-Auth**: the username of `Authorization: Basic ...`, if non-empty
//! 2. **Bearer token**: the `<id>` of `Authorization: Bearer <id>.<opaque>`;
//!    a malformed token is an error, later sources are not tried
//! 3. **Form body**: `client_id` in an `application/x-www-form-urlencoded`
//!    POST, PUT or PATCH body
//! 4. **Query string**: `client_id` in the URL of any other request
//!
//! # Core Types
//!
//! - [`extract_client_id`]: the one-call entry point
//! - [`ClientIdExtractor`]: configurable extractor reporting the [`ClientIdSource`]
//! - [`Body`]: read-once request body that survives form parsing intact
//! - [`Error`]: every way extraction can fail
//!
//! # Examples
//!
//! ```
//! use client_id::{extract_client_id, Body};
//! use http::Request;
//!
//! let mut req = Request::post("https://example.com/token")
//!     .header("Content-Type", "application/x-www-form-urlencoded")
//!     .body(Body::from("client_id=robbie&scope=read"))
//!     .unwrap();
//!
//! assert_eq!(extract_client_id(Some(&mut req)).unwrap(), "robbie");
//!
//! // The handler can still read the untouched body.
//! let body = req.body_mut().read_all().unwrap();
//! assert_eq!(&body[..], b"client_id=robbie&scope=read");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod credentials;
mod error;
mod extractor;
mod form;
mod secret;
mod source;

pub use body::Body;
pub use credentials::{basic_auth, parse_bearer_token, BasicCredentials, BEARER_PREFIX};
pub use error::{Error, FormError, FormLocation};
pub use extractor::{
    extract_client_id, ClientId, ClientIdExtractor, ExtractClientId, DEFAULT_FIELD_NAME,
    DEFAULT_MAX_FORM_BYTES,
};
pub use form::{Form, ParsedForm};
pub use secret::Secret;
pub use source::ClientIdSource;
