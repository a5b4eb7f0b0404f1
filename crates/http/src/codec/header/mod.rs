//! Line-level codecs for the request head and the response head.
//!
//! # Components
//!
//! - [`decode_request_line`]: parses `METHOD SP TARGET SP HTTP/1.1 CRLF`
//! - [`decode_field`]: parses one `Key: value CRLF` line into [`Headers`](crate::protocol::Headers),
//!   folding repeated keys
//! - [`HeaderEncoder`] and [`encode_status_line`]: write the status line and
//!   header/trailer sections of a response

mod field_decoder;
mod header_encoder;
mod request_line_decoder;

pub use field_decoder::{FieldStatus, decode_field};
pub(crate) use header_encoder::FastWrite;
pub use header_encoder::{HeaderEncoder, encode_status_line};
pub use request_line_decoder::decode_request_line;
