//! Body framing for requests and responses.
//!
//! - [`LengthDecoder`]: accumulates a `Content-Length` framed request body
//! - [`ChunkedEncoder`]: frames response bodies with chunked transfer encoding

mod chunked_encoder;
mod length_decoder;

pub use chunked_encoder::ChunkedEncoder;
pub use length_decoder::{LengthDecoder, content_length};
