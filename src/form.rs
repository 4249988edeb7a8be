//! `application/x-www-form-urlencoded` parsing.
//!
//! Decoding goes through [`url::form_urlencoded`]; this module adds the
//! strictness that crate omits (malformed `%` escapes and `;` separators are
//! rejected instead of passed through) and a multi-valued, order-preserving
//! container.

use url::form_urlencoded;

use crate::error::FormError;
use crate::source::ClientIdSource;

/// Decoded form fields in the order they appeared.
///
/// Keys may repeat; [`Form::get`] returns the first value for a key.
///
/// # Examples
///
/// ```
/// use client_id::Form;
///
/// let form = Form::parse(b"client_id=first&client_id=second&scope=a+b").unwrap();
/// assert_eq!(form.get("client_id"), Some("first"));
/// assert_eq!(form.get("scope"), Some("a b"));
/// assert_eq!(form.get_all("client_id").count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pairs: Vec<(String, String)>,
}

impl Form {
    /// Creates an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses URL-encoded form data.
    ///
    /// # Errors
    ///
    /// - [`FormError::Semicolon`] if a pair contains `;`
    /// - [`FormError::InvalidEscape`] if a `%` is not followed by two hex digits
    pub fn parse(input: &[u8]) -> Result<Self, FormError> {
        validate(input)?;

        let pairs = form_urlencoded::parse(input)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Self { pairs })
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns every value for `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.pairs
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Appends a field.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Appends every field of `other` after the existing ones.
    pub fn extend(&mut self, other: Form) {
        self.pairs.extend(other.pairs);
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encodes the form back into `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

/// Form fields already decoded for a request.
///
/// Stored in the request extensions so repeated extraction reuses it and
/// never reads the body twice. Body fields shadow query fields of the same
/// key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedForm {
    /// Fields of a URL-encoded request body
    pub body: Form,
    /// Fields of the URL query string
    pub query: Form,
}

impl ParsedForm {
    /// Returns the first value for `key` and where it was found.
    ///
    /// # Examples
    ///
    /// ```
    /// use client_id::{ClientIdSource, Form, ParsedForm};
    ///
    /// let parsed = ParsedForm {
    ///     body: Form::parse(b"grant_type=client_credentials").unwrap(),
    ///     query: Form::parse(b"client_id=robbie").unwrap(),
    /// };
    /// assert_eq!(parsed.get("client_id"), Some(("robbie", ClientIdSource::Query)));
    /// ```
    pub fn get(&self, key: &str) -> Option<(&str, ClientIdSource)> {
        match self.body.get(key) {
            Some(value) => Some((value, ClientIdSource::FormBody)),
            None => self.query.get(key).map(|value| (value, ClientIdSource::Query)),
        }
    }
}

fn validate(input: &[u8]) -> Result<(), FormError> {
    let mut offset = 0;
    for segment in input.split(|&b| b == b'&') {
        if segment.contains(&b';') {
            return Err(FormError::Semicolon);
        }

        let mut i = 0;
        while i < segment.len() {
            if segment[i] == b'%' {
                let valid = segment.len() > i + 2
                    && segment[i + 1].is_ascii_hexdigit()
                    && segment[i + 2].is_ascii_hexdigit();
                if !valid {
                    return Err(FormError::InvalidEscape {
                        position: offset + i,
                    });
                }
                i += 3;
            } else {
                i += 1;
            }
        }

        offset += segment.len() + 1;
    }
    Ok(())
}
