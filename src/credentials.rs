//! Credentials carried in the `Authorization` header.

use base64::{engine::general_purpose::STANDARD, Engine};
use http::{header, HeaderMap};

use crate::error::Error;
use crate::secret::Secret;

/// Scheme prefix of a Bearer `Authorization` value. Matched case-sensitively.
pub const BEARER_PREFIX: &str = "Bearer ";

const BASIC_PREFIX: &str = "Basic ";

/// Username and password decoded from an HTTP Basic `Authorization` header.
///
/// The password is held in a [`Secret`] so the credentials can be logged.
#[derive(Debug)]
pub struct BasicCredentials {
    /// The username, used as the client_id when non-empty
    pub username: String,
    /// The password
    pub password: Secret<String>,
}

/// Returns the raw bytes of the first `Authorization` value.
pub(crate) fn authorization(headers: &HeaderMap) -> Option<&[u8]> {
    headers.get(header::AUTHORIZATION).map(|v| v.as_bytes())
}

/// Decodes HTTP Basic credentials from the request headers.
///
/// Returns `None` unless the first `Authorization` value uses the `Basic`
/// scheme (compared case-insensitively) with a standard base64 payload that
/// decodes to `username:password`. Only the first `:` separates the two, so
/// passwords may contain colons. Bytes that are not UTF-8 are replaced with
/// U+FFFD.
///
/// # Examples
///
/// ```
/// use client_id::basic_auth;
/// use http::{header, HeaderMap, HeaderValue};
///
/// let mut headers = HeaderMap::new();
/// // "my-client:my:secret"
/// headers.insert(
///     header::AUTHORIZATION,
///     HeaderValue::from_static("Basic bXktY2xpZW50Om15OnNlY3JldA=="),
/// );
///
/// let creds = basic_auth(&headers).unwrap();
/// assert_eq!(creds.username, "my-client");
/// assert_eq!(creds.password.expose_secret(), "my:secret");
/// ```
pub fn basic_auth(headers: &HeaderMap) -> Option<BasicCredentials> {
    let auth = authorization(headers)?;

    let (scheme, payload) = auth.split_at_checked(BASIC_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BASIC_PREFIX.as_bytes()) {
        return None;
    }

    let decoded = STANDARD.decode(payload).ok()?;
    let colon = decoded.iter().position(|&b| b == b':')?;
    let (username, password) = (&decoded[..colon], &decoded[colon + 1..]);

    Some(BasicCredentials {
        username: String::from_utf8_lossy(username).into_owned(),
        password: Secret::new(String::from_utf8_lossy(password).into_owned()),
    })
}

/// Extracts the client_id from a Bearer token of the form `<id>.<opaque>`.
///
/// The token must split on `.` into exactly two fields, the first of which
/// is non-empty. No signature or expiry is checked.
///
/// # Errors
///
/// Returns [`Error::InvalidBearerToken`] for any other shape.
///
/// # Examples
///
/// ```
/// use client_id::{parse_bearer_token, Error};
///
/// assert_eq!(parse_bearer_token("robbie.opaque-part").unwrap(), "robbie");
/// assert!(matches!(parse_bearer_token("a.b.c"), Err(Error::InvalidBearerToken)));
/// assert!(matches!(parse_bearer_token(".opaque"), Err(Error::InvalidBearerToken)));
/// ```
pub fn parse_bearer_token(token: &str) -> Result<String, Error> {
    let mut fields = token.split('.');
    match (fields.next(), fields.next(), fields.next()) {
        (Some(client_id), Some(_), None) if !client_id.is_empty() => Ok(client_id.to_string()),
        _ => Err(Error::InvalidBearerToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn basic(user_pass: &str) -> HeaderMap {
        headers_with_auth(&format!("Basic {}", STANDARD.encode(user_pass)))
    }

    #[test]
    fn basic_auth_decodes_username_and_password() {
        let creds = basic_auth(&basic("robbie:password")).unwrap();
        assert_eq!(creds.username, "robbie");
        assert_eq!(creds.password.expose_secret(), "password");
    }

    #[test]
    fn basic_auth_scheme_is_case_insensitive() {
        let value = format!("bAsIc {}", STANDARD.encode("robbie:pw"));
        let creds = basic_auth(&headers_with_auth(&value)).unwrap();
        assert_eq!(creds.username, "robbie");
    }

    #[test]
    fn basic_auth_allows_empty_username() {
        let creds = basic_auth(&basic(":password")).unwrap();
        assert!(creds.username.is_empty());
    }

    #[test]
    fn basic_auth_requires_colon() {
        assert!(basic_auth(&basic("no-colon-here")).is_none());
    }

    #[test]
    fn basic_auth_rejects_bad_base64() {
        assert!(basic_auth(&headers_with_auth("Basic !!!not-base64")).is_none());
    }

    #[test]
    fn basic_auth_decodes_non_utf8_username_lossily() {
        let value = format!("Basic {}", STANDARD.encode([b'j', 0xf6, b'h', b'n', b':', b'x']));
        let creds = basic_auth(&headers_with_auth(&value)).unwrap();
        assert_eq!(creds.username, "j\u{fffd}hn");
        assert_eq!(creds.password.expose_secret(), "x");
    }

    #[test]
    fn basic_auth_keeps_utf8_username() {
        let creds = basic_auth(&basic("jöhn:pw")).unwrap();
        assert_eq!(creds.username, "jöhn");
    }

    #[test]
    fn basic_auth_ignores_non_ascii_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Basic \xe9t\xe9").unwrap(),
        );
        assert!(basic_auth(&headers).is_none());
    }

    #[test]
    fn authorization_returns_raw_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer j\xc3\xb6hn").unwrap(),
        );
        assert_eq!(authorization(&headers), Some(&b"Bearer j\xc3\xb6hn"[..]));
    }

    #[test]
    fn basic_auth_ignores_other_schemes() {
        assert!(basic_auth(&headers_with_auth("Bearer abc.def")).is_none());
        assert!(basic_auth(&headers_with_auth("Bas")).is_none());
        assert!(basic_auth(&HeaderMap::new()).is_none());
    }

    #[test]
    fn basic_credentials_debug_redacts_password() {
        let creds = basic_auth(&basic("robbie:hunter2")).unwrap();
        let out = format!("{:?}", creds);
        assert!(out.contains("robbie"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn bearer_token_with_two_fields() {
        assert_eq!(
            parse_bearer_token("robbie-client-id.othertokenstuffhere").unwrap(),
            "robbie-client-id"
        );
    }

    #[test]
    fn bearer_token_opaque_half_may_be_empty() {
        assert_eq!(parse_bearer_token("robbie.").unwrap(), "robbie");
    }

    #[test]
    fn bearer_token_rejects_wrong_field_count() {
        for token in ["", "no-dot", "a.b.c", "..."] {
            assert!(
                matches!(parse_bearer_token(token), Err(Error::InvalidBearerToken)),
                "expected {token:?} to be rejected"
            );
        }
    }

    #[test]
    fn bearer_token_rejects_empty_client_id() {
        assert!(matches!(
            parse_bearer_token(".othertokenstuffhere"),
            Err(Error::InvalidBearerToken)
        ));
    }
}
