use std::fmt::Display;
use std::io;

use bytes::BytesMut;
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio_util::codec::Encoder;

use crate::codec::ResponseEncoder;
use crate::protocol::{Headers, ResponsePart, SendError, WriterState, default_headers};

/// Initial capacity of the encode buffer
const INIT_BUFFER_SIZE: usize = 4 * 1024;

/// Writes one response to a byte stream in the only order HTTP allows.
///
/// Every method checks the writer state first. Calling one out of order returns
/// [`SendError::InvalidState`], writes nothing and leaves the state unchanged.
///
/// A response is either
///
/// - status line, headers, one [`write_body`](Self::write_body), or
/// - status line, headers, any number of [`write_chunked_body`](Self::write_chunked_body),
///   [`write_chunked_body_done`](Self::write_chunked_body_done),
///   [`write_trailers`](Self::write_trailers), [`write_done`](Self::write_done).
#[derive(Debug)]
pub struct ResponseWriter<W = OwnedWriteHalf> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(INIT_BUFFER_SIZE), encoder: ResponseEncoder::new() }
    }

    pub fn state(&self) -> WriterState {
        self.encoder.state()
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.send(ResponsePart::StatusLine(status)).await?;
        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), SendError> {
        self.send(ResponsePart::Headers(headers)).await?;
        Ok(())
    }

    /// Writes a fixed-length body. No more body can follow.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, SendError> {
        self.send(ResponsePart::Body(body)).await?;
        Ok(body.len())
    }

    /// Writes one chunk and returns the number of payload bytes written.
    ///
    /// An empty `chunk` writes nothing, since it would read as the end of the body.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, SendError> {
        self.send(ResponsePart::Chunk(chunk)).await?;
        Ok(chunk.len())
    }

    /// Writes the zero-length chunk ending a chunked body and returns the bytes written.
    pub async fn write_chunked_body_done(&mut self) -> Result<usize, SendError> {
        self.send(ResponsePart::ChunkedEof).await
    }

    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), SendError> {
        self.send(ResponsePart::Trailers(trailers)).await?;
        Ok(())
    }

    /// Writes the closing CRLF after the trailer section. Allowed in any state and
    /// never changes it.
    pub async fn write_done(&mut self) -> Result<(), SendError> {
        self.send(ResponsePart::Done).await?;
        Ok(())
    }

    /// Sends a complete 500 response with the error text as a plain text body.
    ///
    /// Only usable before anything else was written.
    pub async fn write_error<E: Display>(&mut self, err: E) -> Result<(), SendError> {
        if self.state() != WriterState::Status {
            return Err(SendError::invalid_state("error response", self.state()));
        }

        let body = err.to_string();
        self.write_status_line(StatusCode::INTERNAL_SERVER_ERROR).await?;
        self.write_headers(&default_headers(body.len())).await?;
        self.write_body(body.as_bytes()).await?;
        Ok(())
    }

    /// Flushes and shuts down the write side of the stream.
    pub async fn shutdown(&mut self) -> Result<(), SendError> {
        self.writer.flush().await?;
        Ok(self.writer.shutdown().await?)
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encodes `part` and writes it out, returning the number of bytes sent.
    ///
    /// The state only advances once the bytes are written and flushed.
    async fn send(&mut self, part: ResponsePart<'_>) -> Result<usize, SendError> {
        self.buffer.clear();
        let checkpoint = self.encoder.clone();
        self.encoder.encode(part, &mut self.buffer)?;

        let written = self.buffer.len();
        if let Err(e) = self.write_buffer().await {
            self.encoder = checkpoint;
            self.buffer.clear();
            return Err(e.into());
        }
        self.buffer.clear();
        Ok(written)
    }

    async fn write_buffer(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.buffer).await?;
        self.writer.flush().await
    }
}
