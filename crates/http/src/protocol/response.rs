//! Status line table for outgoing responses.
//!
//! Only three codes have a reason phrase of their own. Note that 400 is sent with the
//! phrase `Not Found` rather than the standard `Bad Request`; clients of this server
//! match on that literal text, so it is kept. Any other code is sent as a 500 with an
//! empty reason phrase.

use http::StatusCode;

/// Returns the code and reason phrase that go on the status line for `status`.
pub fn status_line(status: StatusCode) -> (u16, &'static str) {
    match status {
        StatusCode::OK => (200, "OK"),
        StatusCode::BAD_REQUEST => (400, "Not Found"),
        StatusCode::INTERNAL_SERVER_ERROR => (500, "Server Error"),
        _ => (500, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes() {
        assert_eq!(status_line(StatusCode::OK), (200, "OK"));
        assert_eq!(status_line(StatusCode::BAD_REQUEST), (400, "Not Found"));
        assert_eq!(status_line(StatusCode::INTERNAL_SERVER_ERROR), (500, "Server Error"));
    }

    #[test]
    fn unknown_codes_fall_back_to_500() {
        assert_eq!(status_line(StatusCode::NOT_FOUND), (500, ""));
        assert_eq!(status_line(StatusCode::CREATED), (500, ""));
        assert_eq!(status_line(StatusCode::BAD_GATEWAY), (500, ""));
    }
}
