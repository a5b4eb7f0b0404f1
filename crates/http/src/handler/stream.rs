use sha2::{Digest, Sha256};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tracing::{debug, error};

use crate::connection::ResponseWriter;
use crate::protocol::{Headers, SendError};

/// Bytes requested from the source per read; each read becomes one chunk
pub const STREAM_READ_SIZE: usize = 32;

const SHA256_TRAILER: &str = "X-Content-SHA256";
const LENGTH_TRAILER: &str = "X-Content-Length";

/// Relays `source` as a chunked body and ends it with digest trailers.
///
/// Expects the status line to be written already. Sends `headers` extended with
/// `transfer-encoding: chunked` and a `trailer` announcement, then one chunk per read
/// from `source` until it is exhausted, the chunk terminator, the trailers
/// `x-content-sha256` (lower-case hex SHA-256 of everything relayed) and
/// `x-content-length`, and the final CRLF.
///
/// A failed read from `source` stops the response where it is and returns
/// [`SendError::Upstream`].
pub async fn stream_with_digest<W, S>(
    writer: &mut ResponseWriter<W>,
    mut headers: Headers,
    mut source: S,
) -> Result<(), SendError>
where
    W: AsyncWrite + Unpin,
    S: AsyncRead + Unpin,
{
    headers.insert("Transfer-Encoding", "chunked");
    headers.insert("Trailer", format!("{SHA256_TRAILER}, {LENGTH_TRAILER}"));
    writer.write_headers(&headers).await?;

    let mut hasher = Sha256::new();
    let mut total = 0usize;
    let mut buf = [0u8; STREAM_READ_SIZE];

    loop {
        let read = match source.read(&mut buf).await {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) => {
                error!(cause = %e, relayed = total, "reading upstream body failed");
                return Err(SendError::upstream(e));
            }
        };

        hasher.update(&buf[..read]);
        total += writer.write_chunked_body(&buf[..read]).await?;
    }

    writer.write_chunked_body_done().await?;

    let mut trailers = Headers::new();
    trailers.insert(SHA256_TRAILER, format!("{:x}", hasher.finalize()));
    trailers.insert(LENGTH_TRAILER, total.to_string());
    writer.write_trailers(&trailers).await?;
    writer.write_done().await?;

    debug!(relayed = total, "streamed body with digest");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::request_reader::tests::ChunkReader;
    use crate::protocol::WriterState;
    use bytes::Bytes;
    use futures::stream;
    use http::StatusCode;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;
    use tokio_util::io::StreamReader;

    /// Yields its data once, then fails.
    struct BrokenUpstream {
        data: Option<&'static [u8]>,
    }

    impl AsyncRead for BrokenUpstream {
        fn poll_read(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::new(io::ErrorKind::UnexpectedEof, "upstream went away"))),
            }
        }
    }

    fn split_once<'a>(haystack: &'a [u8], needle: &[u8]) -> (&'a [u8], &'a [u8]) {
        let at = haystack.windows(needle.len()).position(|w| w == needle).unwrap();
        (&haystack[..at], &haystack[at + needle.len()..])
    }

    #[tokio::test]
    async fn chunks_and_digest_trailers() {
        let data: Vec<u8> = (0..100u8).collect();
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();

        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/octet-stream");
        stream_with_digest(&mut writer, headers, ChunkReader::new(data.clone(), 100)).await.unwrap();
        assert_eq!(writer.state(), WriterState::Done);

        let output = writer.into_inner();
        let (head, mut body) = split_once(&output, b"\r\n\r\n");
        let head = std::str::from_utf8(head).unwrap();
        assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(head.contains("transfer-encoding: chunked"));
        assert!(head.contains("trailer: X-Content-SHA256, X-Content-Length"));
        assert!(head.contains("content-type: application/octet-stream"));

        // 100 bytes in reads of at most 32 bytes
        let mut sizes = Vec::new();
        let mut payload = Vec::new();
        loop {
            let (size, rest) = split_once(body, b"\r\n");
            let size = usize::from_str_radix(std::str::from_utf8(size).unwrap(), 16).unwrap();
            body = rest;
            if size == 0 {
                break;
            }
            sizes.push(size);
            payload.extend_from_slice(&body[..size]);
            body = &body[size + 2..];
        }
        assert_eq!(payload, data);
        assert!(sizes.iter().all(|&size| size <= STREAM_READ_SIZE));

        let digest = format!("{:x}", Sha256::digest(&data));
        let trailers = std::str::from_utf8(body).unwrap();
        assert!(trailers.contains(&format!("x-content-sha256: {digest}\r\n")));
        assert!(trailers.contains("x-content-length: 100\r\n"));
        assert!(trailers.ends_with("\r\n\r\n\r\n"));
    }

    #[tokio::test]
    async fn empty_source() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();

        stream_with_digest(&mut writer, Headers::new(), ChunkReader::new(Vec::new(), 8)).await.unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let empty_digest = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
        assert!(output.contains("\r\n\r\n0\r\n"));
        assert!(output.contains(&format!("x-content-sha256: {empty_digest}\r\n")));
        assert!(output.contains("x-content-length: 0\r\n"));
    }

    #[tokio::test]
    async fn upstream_failure() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();

        let source = BrokenUpstream { data: Some(b"partial") };
        let err = stream_with_digest(&mut writer, Headers::new(), source).await.unwrap_err();

        assert!(matches!(err, SendError::Upstream { .. }));
        assert_eq!(writer.state(), WriterState::Body);
        assert!(writer.get_ref().ends_with(b"7\r\npartial\r\n"));
    }

    #[tokio::test]
    async fn needs_status_line_first() {
        let mut writer = ResponseWriter::new(Vec::new());

        let err = stream_with_digest(&mut writer, Headers::new(), ChunkReader::new("data", 4)).await.unwrap_err();

        assert!(matches!(err, SendError::InvalidState { state: WriterState::Status, .. }));
        assert!(writer.get_ref().is_empty());
    }

    #[tokio::test]
    async fn byte_stream_source() {
        let parts: Vec<io::Result<Bytes>> = vec![Ok(Bytes::from_static(b"{\"slideshow\": ")), Ok(Bytes::from_static(b"{}}"))];
        let source = StreamReader::new(stream::iter(parts));

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        stream_with_digest(&mut writer, Headers::new(), source).await.unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let digest = format!("{:x}", Sha256::digest(b"{\"slideshow\": {}}"));
        assert!(output.contains(&format!("x-content-sha256: {digest}\r\n")));
        assert!(output.contains("x-content-length: 17\r\n"));
    }

    #[tokio::test]
    async fn byte_stream_error_is_upstream() {
        let parts = vec![Ok(Bytes::from_static(b"first")), Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))];
        let source = StreamReader::new(stream::iter(parts));

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK).await.unwrap();
        let err = stream_with_digest(&mut writer, Headers::new(), source).await.unwrap_err();

        assert!(matches!(err, SendError::Upstream { .. }));
        assert!(writer.get_ref().ends_with(b"5\r\nfirst\r\n"));
    }
}
