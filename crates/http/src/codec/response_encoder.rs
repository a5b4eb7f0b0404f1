use bytes::BytesMut;
use tokio_util::codec::Encoder;
use tracing::{trace, warn};

use crate::codec::body::ChunkedEncoder;
use crate::codec::header::{HeaderEncoder, encode_status_line};
use crate::protocol::{ResponsePart, SendError, WriterState};

/// Encodes response parts while enforcing the order they may be sent in.
///
/// ```text
/// Status -> Headers -> Body -> Trailers -> Done
/// ```
///
/// A part that is not legal in the current state is rejected with
/// [`SendError::InvalidState`]; nothing is written to `dst` and the state is kept.
/// In the `Body` state either one fixed body or any number of chunks may be sent;
/// chunks stay in `Body` until the chunk terminator is sent.
///
/// [`ResponsePart::Done`] writes the closing CRLF from any state and never changes it.
#[derive(Debug, Clone)]
pub struct ResponseEncoder {
    state: WriterState,
    header_encoder: HeaderEncoder,
    chunked_encoder: ChunkedEncoder,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    fn expect(&self, part: &ResponsePart<'_>, required: WriterState) -> Result<(), SendError> {
        if self.state == required {
            return Ok(());
        }

        warn!(part = part.name(), state = ?self.state, "response part sent out of order");
        Err(SendError::invalid_state(part.name(), self.state))
    }

    fn transition(&mut self, next: WriterState) {
        trace!(from = ?self.state, to = ?next, "writer state transition");
        self.state = next;
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { state: WriterState::Status, header_encoder: HeaderEncoder, chunked_encoder: ChunkedEncoder::new() }
    }
}

impl Encoder<ResponsePart<'_>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponsePart<'_>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            ResponsePart::StatusLine(status) => {
                self.expect(&item, WriterState::Status)?;
                encode_status_line(status, dst)?;
                self.transition(WriterState::Headers);
            }

            ResponsePart::Headers(headers) => {
                self.expect(&item, WriterState::Headers)?;
                self.header_encoder.encode(headers, dst)?;
                self.transition(WriterState::Body);
            }

            ResponsePart::Body(bytes) => {
                self.expect(&item, WriterState::Body)?;
                dst.extend_from_slice(bytes);
                self.transition(WriterState::Trailers);
            }

            ResponsePart::Chunk(bytes) => {
                self.expect(&item, WriterState::Body)?;
                self.chunked_encoder.encode(bytes, dst)?;
            }

            ResponsePart::ChunkedEof => {
                self.expect(&item, WriterState::Body)?;
                self.chunked_encoder.encode_eof(dst);
                self.transition(WriterState::Trailers);
            }

            ResponsePart::Trailers(trailers) => {
                self.expect(&item, WriterState::Trailers)?;
                self.header_encoder.encode(trailers, dst)?;
                self.transition(WriterState::Done);
            }

            // closing CRLF, valid from any state
            ResponsePart::Done => dst.extend_from_slice(b"\r\n"),
        }

        Ok(())
    }
}
