//! Decoder for the request start line.
//!
//! The line must be exactly three single-space separated tokens: an upper-case
//! alphabetic method, an opaque target and `HTTP/1.1`. The decoder works on the
//! whole buffered prefix and reports that more data is needed until a CRLF shows up.

use http::{Method, Version};

use crate::ensure;
use crate::protocol::{ParseError, RequestLine};
use crate::utils::find_crlf;

/// Attempts to decode a request line from the start of `src`.
///
/// # Returns
///
/// - `Ok(Some((line, consumed)))`: a complete line, `consumed` includes the CRLF
/// - `Ok(None)`: no CRLF buffered yet, read more
/// - `Err(_)`: the line is malformed
pub fn decode_request_line(src: &[u8]) -> Result<Option<(RequestLine, usize)>, ParseError> {
    let Some(end) = find_crlf(src) else {
        return Ok(None);
    };

    let raw = &src[..end];
    let line = std::str::from_utf8(raw).map_err(|_| ParseError::invalid_request_line(String::from_utf8_lossy(raw)))?;

    let mut parts = line.split(' ');
    let (Some(method), Some(target), Some(version), None) = (parts.next(), parts.next(), parts.next(), parts.next()) else {
        return Err(ParseError::invalid_request_line(line));
    };

    let version = parse_version(version)?;

    ensure!(is_valid_method(method), ParseError::invalid_method(method));
    let method = Method::from_bytes(method.as_bytes()).map_err(|_| ParseError::invalid_method(method))?;

    Ok(Some((RequestLine::new(method, target.to_owned(), version), end + 2)))
}

fn parse_version(token: &str) -> Result<Version, ParseError> {
    match token.split_once('/') {
        Some(("HTTP", "1.1")) => Ok(Version::HTTP_11),
        Some((_, version)) => Err(ParseError::invalid_version(version)),
        None => Err(ParseError::invalid_version(token)),
    }
}

/// A method must be non-empty and made of upper-case ASCII letters only.
fn is_valid_method(method: &str) -> bool {
    !method.is_empty() && method.bytes().all(|b| b.is_ascii_uppercase())
}
