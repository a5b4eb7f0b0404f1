//! Accumulator for request bodies framed by a `Content-Length` header.
//!
//! The accumulator is greedy: it takes every byte it is offered and fails as soon as
//! the total goes past the declared length.

use bytes::{Bytes, BytesMut};

use crate::ensure;
use crate::protocol::{Headers, ParseError};

/// Upper bound on the body buffer reserved up front, whatever length is declared.
const MAX_PREALLOCATE: usize = 8 * 1024;

/// Collects exactly `length` bytes of body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The length declared by the Content-Length header
    length: usize,
    body: BytesMut,
}

impl LengthDecoder {
    pub fn new(length: usize) -> Self {
        Self { length, body: BytesMut::with_capacity(length.min(MAX_PREALLOCATE)) }
    }

    /// Appends all of `src` to the body and returns the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BodyTooLong`] once more bytes than declared have arrived.
    pub fn accumulate(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        self.body.extend_from_slice(src);
        ensure!(self.body.len() <= self.length, ParseError::BodyTooLong { expected: self.length, received: self.body.len() });
        Ok(src.len())
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.body.len() == self.length
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn received(&self) -> usize {
        self.body.len()
    }

    pub fn into_body(self) -> Bytes {
        self.body.freeze()
    }
}

/// Reads the declared body length from `headers`.
///
/// Returns `Ok(None)` when there is no Content-Length header, which means the request
/// has no body.
///
/// # Errors
///
/// Returns [`ParseError::InvalidContentLength`] if the value is not a non-negative
/// decimal integer. A folded value such as `5, 5` is rejected as well.
pub fn content_length(headers: &Headers) -> Result<Option<usize>, ParseError> {
    let Some(value) = headers.get("content-length") else {
        return Ok(None);
    };

    ensure!(
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
        ParseError::invalid_content_length(format!("value {value} is not a non-negative integer"))
    );

    value
        .parse::<usize>()
        .map(Some)
        .map_err(|e| ParseError::invalid_content_length(format!("value {value} can't be parsed: {e}")))
}
