//! Core HTTP protocol types.
//!
//! This module holds the data model shared by the codecs and the connection layer:
//!
//! - **Requests**: [`Request`] and its [`RequestLine`]
//! - **Headers** ([`headers`]): the case-insensitive, folding [`Headers`] map
//! - **Responses**: [`ResponsePart`] and the [`status_line`] table
//! - **State**: [`ParseState`] and [`WriterState`]
//! - **Errors**: [`ParseError`], [`SendError`] and the umbrella [`HttpError`]

mod message;
pub use message::ResponsePart;

mod request;
pub use request::Request;
pub use request::RequestLine;

pub mod headers;
pub use headers::Headers;
pub use headers::default_headers;

mod response;
pub use response::status_line;

mod state;
pub use state::ParseState;
pub use state::WriterState;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
