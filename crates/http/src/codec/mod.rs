//! HTTP codec module for decoding requests and encoding responses
//!
//! Everything in here is sans-io: the codecs only look at and fill byte buffers,
//! the connection layer does the reading and writing.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: drives the parse state machine over a growing buffer
//!   - Request line and header field parsing via [`header`]
//!   - `Content-Length` body accumulation via [`body`]
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: enforces the status, headers, body, trailers order
//!   - Status line and header section encoding via [`header`]
//!   - Chunked framing via [`body`]

pub mod body;
pub mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
