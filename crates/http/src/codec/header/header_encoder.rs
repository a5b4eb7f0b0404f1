//! Serialization of the status line and of header/trailer sections.
//!
//! Header lines are written as `key: value\r\n` in the iteration order of
//! [`Headers`], which is unspecified, followed by a blank `\r\n` line.

use bytes::{BufMut, BytesMut};
use http::StatusCode;
use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

use crate::protocol::{Headers, SendError, status_line};

/// Initial buffer size reserved for a header section
const INIT_HEADER_SIZE: usize = 1024;

/// Writes `HTTP/1.1 <code> <reason>\r\n` for `status` into `dst`.
pub fn encode_status_line(status: StatusCode, dst: &mut BytesMut) -> Result<(), SendError> {
    let (code, reason) = status_line(status);
    write!(FastWrite(dst), "HTTP/1.1 {code} {reason}\r\n")?;
    Ok(())
}

/// Encoder for a header or trailer section.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&Headers> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, headers: &Headers, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        for (name, value) in headers {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Fast writer implementation for writing to BytesMut.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_lines() {
        let mut dst = BytesMut::new();
        encode_status_line(StatusCode::OK, &mut dst).unwrap();
        encode_status_line(StatusCode::BAD_REQUEST, &mut dst).unwrap();
        encode_status_line(StatusCode::INTERNAL_SERVER_ERROR, &mut dst).unwrap();
        encode_status_line(StatusCode::IM_A_TEAPOT, &mut dst).unwrap();

        assert_eq!(
            &dst[..],
            &b"HTTP/1.1 200 OK\r\nHTTP/1.1 400 Not Found\r\nHTTP/1.1 500 Server Error\r\nHTTP/1.1 500 \r\n"[..]
        );
    }

    #[test]
    fn header_section() {
        let mut headers = Headers::new();
        headers.insert("Content-Length", "12");
        headers.insert("connection", "close");

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&headers, &mut dst).unwrap();

        let text = std::str::from_utf8(&dst).unwrap();
        assert!(text.ends_with("\r\n\r\n"));

        let mut lines: Vec<&str> = text.trim_end_matches("\r\n").split("\r\n").collect();
        lines.sort_unstable();
        assert_eq!(lines, vec!["connection: close", "content-length: 12"]);
    }

    #[test]
    fn empty_header_section() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&Headers::new(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"\r\n");
    }
}
