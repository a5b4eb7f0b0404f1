//! Decoder for single header field lines.
//!
//! Each call looks at one line of the buffered header section. A field line is
//! split on whitespace and must have exactly two fields, `Key:` and the value.
//! An empty line ends the header section.

use crate::ensure;
use crate::protocol::headers::is_token_char;
use crate::protocol::{Headers, ParseError};
use crate::utils::find_crlf;

/// Outcome of decoding one header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStatus {
    /// No complete line is buffered yet
    Partial,
    /// A field was stored; holds the bytes consumed including the CRLF
    Parsed(usize),
    /// The blank line ending the header section; holds the bytes consumed (the CRLF)
    End(usize),
}

/// Decodes the header line at the start of `src` into `headers`.
///
/// Keys are lower-cased before being stored and a repeated key is folded into the
/// existing value with `", "`.
pub fn decode_field(src: &[u8], headers: &mut Headers) -> Result<FieldStatus, ParseError> {
    let Some(end) = find_crlf(src) else {
        return Ok(FieldStatus::Partial);
    };

    if end == 0 {
        return Ok(FieldStatus::End(2));
    }

    let raw = &src[..end];
    let line = std::str::from_utf8(raw).map_err(|_| ParseError::invalid_header(String::from_utf8_lossy(raw)))?;

    let mut fields = line.split_ascii_whitespace();
    let (Some(name), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(ParseError::invalid_header(line));
    };

    let Some(key) = name.strip_suffix(':') else {
        return Err(ParseError::invalid_header(line));
    };

    ensure!(!key.is_empty(), ParseError::invalid_header(line));
    ensure!(key.bytes().all(is_token_char), ParseError::invalid_header_key(key));

    headers.append(key, value);

    Ok(FieldStatus::Parsed(end + 2))
}
