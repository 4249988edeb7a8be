use std::fmt;
use std::io;

use thiserror::Error as ThisError;

/// Errors returned while locating a client_id.
///
/// Every failure is handed back to the caller; nothing is retried.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The caller passed no request at all.
    #[error("cannot get client_id from nil request")]
    NilRequest,

    /// An `Authorization: Bearer` header was present but its token is malformed.
    #[error("invalid token")]
    InvalidBearerToken,

    /// No source carried a non-empty client_id.
    #[error("failed to find client_id in request")]
    MissingClientId,

    /// Reading the request body failed.
    ///
    /// Any bytes read before the failure are put back into the body.
    #[error("failed to read request body")]
    ReadBody(#[source] io::Error),

    /// The form body or URL query could not be decoded.
    #[error("failed to parse request form from {location}")]
    ParseForm {
        /// Where the malformed form data came from
        location: FormLocation,
        /// What was wrong with it
        #[source]
        source: FormError,
    },

    /// The form body exceeds the configured buffering limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge {
        /// The limit that was exceeded, in bytes
        limit: usize,
    },
}

impl Error {
    pub(crate) fn parse_form(location: FormLocation, source: FormError) -> Self {
        Error::ParseForm { location, source }
    }
}

/// Location of form data that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormLocation {
    /// An `application/x-www-form-urlencoded` request body
    Body,
    /// The URL query string
    Url,
}

impl fmt::Display for FormLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormLocation::Body => write!(f, "body"),
            FormLocation::Url => write!(f, "URL"),
        }
    }
}

/// Reasons URL-encoded form data is rejected.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum FormError {
    /// A `%` not followed by two hex digits.
    #[error("invalid URL escape at byte {position}")]
    InvalidEscape {
        /// Byte offset of the offending `%`
        position: usize,
    },

    /// Pairs separated by `;` instead of `&`.
    #[error("invalid semicolon separator in form data")]
    Semicolon,
}
