//! Progress markers for the request parser and the response writer.
//!
//! Both machines are monotonic: a state only ever moves to a later variant.

/// Where the request decoder is in the request it is building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ParseState {
    /// Waiting for the request line
    Start,
    /// Reading header lines until the blank line
    ParsingHeaders,
    /// Accumulating `Content-Length` bytes of body
    ParsingBody,
    /// A complete request has been parsed
    Done,
}

/// Which part of the response the writer expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WriterState {
    Status,
    Headers,
    Body,
    Trailers,
    Done,
}
