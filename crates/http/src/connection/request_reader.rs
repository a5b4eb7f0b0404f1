use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, ParseState, Request};

/// Initial capacity of the read buffer
pub const INIT_BUFFER_SIZE: usize = 1024;

/// Reads one request from a byte stream.
///
/// Bytes are read into a buffer that doubles its capacity whenever it is full, and
/// after every read the decoder is given the whole buffered prefix. Bytes the decoder
/// consumed are dropped from the front of the buffer.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: BytesMut,
    decoder: RequestDecoder,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, INIT_BUFFER_SIZE)
    }

    pub fn with_capacity(reader: R, buffer_size: usize) -> Self {
        Self { reader, buffer: BytesMut::with_capacity(buffer_size.max(1)), decoder: RequestDecoder::new() }
    }

    pub fn state(&self) -> ParseState {
        self.decoder.state()
    }

    /// Reads until a complete request has been parsed.
    ///
    /// # Errors
    ///
    /// - a [`ParseError`] describing malformed input, as soon as it is seen
    /// - [`ParseError::IncompleteBody`] if the stream ends inside the body
    /// - [`ParseError::IncompleteRequest`] if the stream ends before the headers are complete
    /// - [`ParseError::Io`] if reading fails
    /// - [`ParseError::AlreadyDone`] if called again after a request was returned
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(request);
            }

            if self.buffer.len() == self.buffer.capacity() {
                let capacity = self.buffer.capacity();
                self.buffer.reserve(capacity);
                trace!(from = capacity, to = self.buffer.capacity(), "grow read buffer");
            }

            let read = self.reader.read_buf(&mut self.buffer).await?;
            trace!(read, buffered = self.buffer.len(), "read from stream");

            if read == 0 {
                return self.decoder.decode_eof(&mut self.buffer)?.ok_or(ParseError::IncompleteRequest);
            }
        }
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use http::Method;
    use indoc::indoc;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    /// Hands out at most `chunk` bytes per read, whatever the caller asks for.
    pub(crate) struct ChunkReader {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl ChunkReader {
        pub(crate) fn new(data: impl Into<Vec<u8>>, chunk: usize) -> Self {
            Self { data: data.into(), pos: 0, chunk }
        }
    }

    impl AsyncRead for ChunkReader {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            let remaining = &self.data[self.pos..];
            let amt = remaining.len().min(buf.remaining()).min(self.chunk);
            buf.put_slice(&remaining[..amt]);
            self.pos += amt;
            Poll::Ready(Ok(()))
        }
    }

    struct FailingReader;

    impl AsyncRead for FailingReader {
        fn poll_read(self: Pin<&mut Self>, _cx: &mut Context<'_>, _buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer")))
        }
    }

    fn crlf(text: &str) -> String {
        text.replace('\n', "\r\n")
    }

    #[tokio::test]
    async fn good_get_request_one_byte_at_a_time() {
        let data = crlf(indoc! {r##"
        GET / HTTP/1.1
        Host: localhost:42069
        User-Agent: curl/7.81.0
        Accept: */*

        "##});

        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 1), 8);
        let request = reader.read_request().await.unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.target(), "/");
        assert_eq!(request.headers().get("host"), Some("localhost:42069"));
        assert_eq!(reader.state(), ParseState::Done);
    }

    #[tokio::test]
    async fn same_request_for_any_read_size() {
        let data = crlf(indoc! {r##"
        POST /coffee HTTP/1.1
        Host: localhost:42069
        Content-Type: application/json
        Content-Length: 22

        {"flavor":"dark mode"}"##});

        let whole = RequestReader::new(ChunkReader::new(data.clone(), data.len())).read_request().await.unwrap();
        assert_eq!(&whole.body()[..], br#"{"flavor":"dark mode"}"#);

        for chunk in [1, 2, 3, 5, 8, 13, 64] {
            let mut reader = RequestReader::with_capacity(ChunkReader::new(data.clone(), chunk), 8);
            let request = reader.read_request().await.unwrap();
            assert_eq!(request, whole, "read size {chunk}");
        }
    }

    #[tokio::test]
    async fn large_request_grows_buffer() {
        let value = "v".repeat(4096);
        let data = format!("GET / HTTP/1.1\r\nX-Large: {value}\r\n\r\n");

        let mut reader = RequestReader::with_capacity(ChunkReader::new(data, 100), 8);
        let request = reader.read_request().await.unwrap();

        assert_eq!(request.headers().get("x-large").map(str::len), Some(4096));
    }

    #[tokio::test]
    async fn shorter_body_than_declared() {
        let data = "POST /submit HTTP/1.1\r\nContent-Length: 20\r\n\r\npartial content";
        let err = RequestReader::new(ChunkReader::new(data, 3)).read_request().await.unwrap_err();

        assert!(matches!(err, ParseError::IncompleteBody { expected: 20, received: 15 }));
    }

    #[tokio::test]
    async fn stream_ends_in_headers() {
        let data = "GET / HTTP/1.1\r\nHost: localhost\r\n";
        let err = RequestReader::new(ChunkReader::new(data, 3)).read_request().await.unwrap_err();

        assert!(matches!(err, ParseError::IncompleteRequest));
    }

    #[tokio::test]
    async fn malformed_request_line() {
        let data = "/coffee HTTP/1.1\r\nHost: localhost:42069\r\n\r\n";
        let err = RequestReader::new(ChunkReader::new(data, 3)).read_request().await.unwrap_err();

        assert!(matches!(err, ParseError::InvalidRequestLine { .. }));
    }

    #[tokio::test]
    async fn transport_error_is_propagated() {
        let err = RequestReader::new(FailingReader).read_request().await.unwrap_err();

        assert!(matches!(err, ParseError::Io { .. }));
    }

    #[tokio::test]
    async fn reading_twice_fails() {
        let mut reader = RequestReader::new(ChunkReader::new("GET / HTTP/1.1\r\n\r\n", 64));
        reader.read_request().await.unwrap();

        assert!(matches!(reader.read_request().await, Err(ParseError::AlreadyDone)));
    }
}
