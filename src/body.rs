//! Read-once request bodies that can be buffered and put back.

use std::fmt;
use std::io::{self, Cursor, Read};

use bytes::Bytes;

use crate::error::Error;

/// The body of an inbound request.
///
/// A `Body` is either absent or a byte stream that can be read once.
/// When the extractor has to look inside a form body it buffers the stream
/// and replaces it with an in-memory copy, so whoever reads the body next
/// sees exactly the bytes the client sent.
///
/// # Examples
///
/// ```
/// use std::io::Read;
/// use client_id::Body;
///
/// let mut body = Body::from("client_id=abc");
/// assert!(body.is_present());
///
/// let mut text = String::new();
/// body.read_to_string(&mut text).unwrap();
/// assert_eq!(text, "client_id=abc");
///
/// assert!(!Body::empty().is_present());
/// ```
#[derive(Default)]
pub struct Body {
    reader: Option<Box<dyn Read + Send>>,
}

impl Body {
    /// Creates an absent body.
    pub fn empty() -> Self {
        Self { reader: None }
    }

    /// Wraps an arbitrary reader as the body stream.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: Read + Send + 'static,
    {
        Self {
            reader: Some(Box::new(reader)),
        }
    }

    /// Returns true if the request carries a body stream.
    pub fn is_present(&self) -> bool {
        self.reader.is_some()
    }

    /// Reads the remaining body into memory.
    pub fn read_all(&mut self) -> io::Result<Bytes> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(Bytes::from(buf))
    }

    /// Buffers up to `limit` bytes and rewinds the body to its start.
    ///
    /// On every outcome the body is restored: bytes already pulled from the
    /// stream are placed back in front of whatever was not read yet.
    pub(crate) fn buffer(&mut self, limit: usize) -> Result<Bytes, Error> {
        let Some(mut reader) = self.reader.take() else {
            return Ok(Bytes::new());
        };

        let mut buf = Vec::new();
        let read = reader
            .by_ref()
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut buf);
        let bytes = Bytes::from(buf);

        match read {
            Ok(_) if bytes.len() <= limit => {
                self.reader = Some(Box::new(Cursor::new(bytes.clone())));
                Ok(bytes)
            }
            Ok(_) => {
                self.reader = Some(Box::new(Cursor::new(bytes).chain(reader)));
                Err(Error::BodyTooLarge { limit })
            }
            Err(err) => {
                self.reader = Some(Box::new(Cursor::new(bytes).chain(reader)));
                Err(Error::ReadBody(err))
            }
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.reader.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("present", &self.is_present())
            .finish()
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::from(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::from(Bytes::from(text))
    }
}

impl From<&'static str> for Body {
    fn from(text: &'static str) -> Self {
        Self::from(Bytes::from_static(text.as_bytes()))
    }
}

impl From<&'static [u8]> for Body {
    fn from(bytes: &'static [u8]) -> Self {
        Self::from(Bytes::from_static(bytes))
    }
}
