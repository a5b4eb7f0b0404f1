use std::io;
use thiserror::Error;

use crate::protocol::WriterState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("invalid request line: {line}")]
    InvalidRequestLine { line: String },

    #[error("invalid http version: {version}")]
    InvalidVersion { version: String },

    #[error("invalid http method: {method}")]
    InvalidMethod { method: String },

    #[error("invalid header format: {reason}")]
    InvalidHeader { reason: String },

    #[error("invalid character in header key: {key}")]
    InvalidHeaderKey { key: String },

    #[error("invalid content-length header: {reason}")]
    InvalidContentLength { reason: String },

    #[error("body exceeds declared length, content-length: {expected}, received: {received}")]
    BodyTooLong { expected: usize, received: usize },

    #[error("incomplete request: all data parsed, but no end was found")]
    IncompleteRequest,

    #[error("incomplete body: content-length {expected}, but only {received} bytes received")]
    IncompleteBody { expected: usize, received: usize },

    #[error("trying to read data in a done state")]
    AlreadyDone,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn invalid_request_line<S: ToString>(line: S) -> Self {
        Self::InvalidRequestLine { line: line.to_string() }
    }

    pub fn invalid_version<S: ToString>(version: S) -> Self {
        Self::InvalidVersion { version: version.to_string() }
    }

    pub fn invalid_method<S: ToString>(method: S) -> Self {
        Self::InvalidMethod { method: method.to_string() }
    }

    pub fn invalid_header<S: ToString>(str: S) -> Self {
        Self::InvalidHeader { reason: str.to_string() }
    }

    pub fn invalid_header_key<S: ToString>(key: S) -> Self {
        Self::InvalidHeaderKey { key: key.to_string() }
    }

    pub fn invalid_content_length<S: ToString>(str: S) -> Self {
        Self::InvalidContentLength { reason: str.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("cannot write {operation} while the writer is in {state:?} state")]
    InvalidState { operation: &'static str, state: WriterState },

    #[error("upstream body source error: {source}")]
    Upstream { source: io::Error },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn invalid_state(operation: &'static str, state: WriterState) -> Self {
        Self::InvalidState { operation, state }
    }

    pub fn upstream<E: Into<io::Error>>(e: E) -> Self {
        Self::Upstream { source: e.into() }
    }
}
