//! Parsed HTTP request types.
//!
//! A [`Request`] is produced by the request decoder once parsing reaches its terminal
//! state, and is immutable from then on. Handlers only ever see it by reference.

use bytes::Bytes;
use http::{Method, Version};

use crate::protocol::Headers;

/// The `METHOD SP TARGET SP HTTP/1.1` start line of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    method: Method,
    target: String,
    version: Version,
}

impl RequestLine {
    pub(crate) fn new(method: Method, target: String, version: Version) -> Self {
        Self { method, target, version }
    }

    /// The request method, always upper-case alphabetic.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The request target exactly as it appeared on the wire.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The protocol version, only HTTP/1.1 is ever accepted.
    pub fn version(&self) -> Version {
        self.version
    }
}

/// A fully parsed request: start line, folded headers and the body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: Headers,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: Headers, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> &Method {
        self.request_line.method()
    }

    pub fn target(&self) -> &str {
        self.request_line.target()
    }

    pub fn version(&self) -> Version {
        self.request_line.version()
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The body, empty when the request carried no `Content-Length`.
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}
