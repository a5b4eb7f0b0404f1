use bytes::BytesMut;
use std::io::Write;
use tokio_util::codec::Encoder;
use tracing::trace;

use crate::codec::header::FastWrite;
use crate::protocol::SendError;

/// Frames body bytes as HTTP/1.1 chunks.
///
/// Each chunk is `<hex len>\r\n<bytes>\r\n`. The terminating zero-length chunk is
/// written by [`ChunkedEncoder::encode_eof`] without the final CRLF, so trailers can
/// follow it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes the `0\r\n` marker ending the chunk sequence.
    pub fn encode_eof(&mut self, dst: &mut BytesMut) {
        if self.eof {
            return;
        }
        self.eof = true;
        trace!(send_size = self.send_size, "chunked body finished");
        dst.extend_from_slice(b"0\r\n");
    }
}

impl Encoder<&[u8]> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, bytes: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        // an empty chunk would read as the terminator
        if self.eof || bytes.is_empty() {
            return Ok(());
        }

        write!(FastWrite(dst), "{:x}\r\n", bytes.len())?;
        dst.reserve(bytes.len() + 2);
        dst.extend_from_slice(bytes);
        dst.extend_from_slice(b"\r\n");
        self.send_size += bytes.len();
        Ok(())
    }
}
