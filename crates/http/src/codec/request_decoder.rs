//! HTTP request decoder module
//!
//! This module drives the request line, header and body parsers over a buffer that
//! may hold any prefix of a request. It can be fed one byte at a time or the whole
//! message at once and produces the same [`Request`] either way.
//!
//! # State Machine
//!
//! ```text
//! Start --request line--> ParsingHeaders --blank line--> ParsingBody --Content-Length bytes--> Done
//!                                              \------------- no Content-Length ------------/
//! ```
//!
//! # Example
//!
//! ```
//! use tcp_http::codec::RequestDecoder;
//! use tokio_util::codec::Decoder;
//! use bytes::BytesMut;
//!
//! let mut decoder = RequestDecoder::new();
//! let mut buffer = BytesMut::from(&b"GET /x HTTP/1.1\r\nHost: a\r\n\r\n"[..]);
//! let request = decoder.decode(&mut buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/x");
//! ```

use std::mem;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::{LengthDecoder, content_length};
use crate::codec::header::{FieldStatus, decode_field, decode_request_line};
use crate::ensure;
use crate::protocol::{Headers, ParseError, ParseState, Request, RequestLine};

/// An incremental decoder for one HTTP/1.1 request.
///
/// The decoder keeps the partially built request between calls. Each call to
/// [`parse`](RequestDecoder::parse) consumes as much of the offered bytes as the
/// current state allows; returning `0` without an error means more bytes are needed.
#[derive(Debug)]
pub struct RequestDecoder {
    state: ParseState,
    request_line: Option<RequestLine>,
    headers: Headers,
    body: Option<LengthDecoder>,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Parses as much of `data` as possible and returns the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the data is malformed, or
    /// [`ParseError::AlreadyDone`] if the request was already complete.
    pub fn parse(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        ensure!(self.state != ParseState::Done, ParseError::AlreadyDone);

        let mut parsed = 0;
        while self.state != ParseState::Done {
            let n = self.parse_single(&data[parsed..])?;
            if n == 0 {
                break;
            }
            parsed += n;
        }
        Ok(parsed)
    }

    fn parse_single(&mut self, data: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Start => match decode_request_line(data)? {
                Some((request_line, consumed)) => {
                    self.request_line = Some(request_line);
                    self.transition(ParseState::ParsingHeaders);
                    Ok(consumed)
                }
                None => Ok(0),
            },

            ParseState::ParsingHeaders => match decode_field(data, &mut self.headers)? {
                FieldStatus::Partial => Ok(0),
                FieldStatus::Parsed(consumed) => Ok(consumed),
                FieldStatus::End(consumed) => {
                    self.finish_headers()?;
                    Ok(consumed)
                }
            },

            ParseState::ParsingBody => {
                let Some(body) = &mut self.body else {
                    self.transition(ParseState::Done);
                    return Ok(0);
                };

                let consumed = body.accumulate(data)?;
                if body.is_complete() {
                    self.transition(ParseState::Done);
                }
                Ok(consumed)
            }

            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }

    fn finish_headers(&mut self) -> Result<(), ParseError> {
        match content_length(&self.headers)? {
            Some(length) => {
                self.body = Some(LengthDecoder::new(length));
                self.transition(ParseState::ParsingBody);
            }
            None => self.transition(ParseState::Done),
        }
        Ok(())
    }

    fn transition(&mut self, next: ParseState) {
        debug_assert!(next > self.state, "parse state must move forward: {:?} -> {next:?}", self.state);
        trace!(from = ?self.state, to = ?next, "parse state transition");
        self.state = next;
    }

    fn take_request(&mut self) -> Result<Request, ParseError> {
        let request_line = self.request_line.take().ok_or(ParseError::IncompleteRequest)?;
        let headers = mem::take(&mut self.headers);
        let body = self.body.take().map(LengthDecoder::into_body).unwrap_or_default();
        Ok(Request::new(request_line, headers, body))
    }
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self { state: ParseState::Start, request_line: None, headers: Headers::new(), body: None }
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// Consumed bytes are removed from the front of `src`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let parsed = self.parse(src)?;
        src.advance(parsed);

        if self.state == ParseState::Done { self.take_request().map(Some) } else { Ok(None) }
    }

    /// Called once the stream has ended; anything short of a complete request is an error.
    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        match (&self.state, &self.body) {
            (ParseState::ParsingBody, Some(body)) => {
                Err(ParseError::IncompleteBody { expected: body.expected(), received: body.received() })
            }
            _ => Err(ParseError::IncompleteRequest),
        }
    }
}
