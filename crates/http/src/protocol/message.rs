use http::StatusCode;

use crate::protocol::Headers;

/// One piece of an outgoing response, in the order it may be emitted.
///
/// The response encoder accepts these one at a time and rejects any piece that is
/// not legal in its current [`WriterState`](crate::protocol::WriterState).
#[derive(Debug, Clone, Copy)]
pub enum ResponsePart<'a> {
    /// `HTTP/1.1 <code> <reason>\r\n`
    StatusLine(StatusCode),
    /// Header lines followed by the blank line ending the header section
    Headers(&'a Headers),
    /// A fixed-length body, written verbatim and only once
    Body(&'a [u8]),
    /// One chunk of a chunked body: `<hex len>\r\n<bytes>\r\n`
    Chunk(&'a [u8]),
    /// The zero-length chunk marking the end of a chunked body
    ChunkedEof,
    /// Trailer lines followed by a blank line
    Trailers(&'a Headers),
    /// The closing CRLF after the chunked trailer section
    Done,
}

impl ResponsePart<'_> {
    /// Short name used in state errors and logs.
    pub fn name(&self) -> &'static str {
        match self {
            ResponsePart::StatusLine(_) => "status line",
            ResponsePart::Headers(_) => "headers",
            ResponsePart::Body(_) => "body",
            ResponsePart::Chunk(_) => "chunked body",
            ResponsePart::ChunkedEof => "chunked body end",
            ResponsePart::Trailers(_) => "trailers",
            ResponsePart::Done => "done",
        }
    }
}
