//! Connection handling: the I/O side of the codecs
//!
//! - [`RequestReader`]: reads from an `AsyncRead` into a growable buffer until the
//!   [`RequestDecoder`](crate::codec::RequestDecoder) yields a request
//! - [`ResponseWriter`]: encodes response parts in order and writes them to an `AsyncWrite`
//! - [`HttpConnection`]: ties both to a handler for a single request/response exchange

mod http_connection;
pub(crate) mod request_reader;
mod response_writer;

pub use http_connection::HttpConnection;
pub use request_reader::{INIT_BUFFER_SIZE, RequestReader};
pub use response_writer::ResponseWriter;
