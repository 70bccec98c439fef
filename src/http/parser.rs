use std::fmt;

use crate::http::headers::Headers;
use crate::http::request::{Method, Request, is_token};
use crate::http::target::{DecodedTarget, decode_target};

/// Upper bound on the request line plus header block.
pub const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    InvalidRequest,
    InvalidMethod,
    InvalidTarget,
    InvalidVersion,
    InvalidHeader,
    InvalidContentLength,
    UnsupportedTransferEncoding,
    HeadersTooLarge,
    BodyTooLarge,
    Incomplete,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::InvalidRequest => "malformed request line",
            ParseError::InvalidMethod => "invalid method token",
            ParseError::InvalidTarget => "invalid request target",
            ParseError::InvalidVersion => "unsupported HTTP version",
            ParseError::InvalidHeader => "malformed header line",
            ParseError::InvalidContentLength => "invalid Content-Length",
            ParseError::UnsupportedTransferEncoding => "Transfer-Encoding is not supported",
            ParseError::HeadersTooLarge => "request head too large",
            ParseError::BodyTooLarge => "request body too large",
            ParseError::Incomplete => "incomplete request",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// The first line of a request.
#[derive(Debug, Clone)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    pub decoded: DecodedTarget,
    pub version: String,
}

/// Everything before the body.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub line: RequestLine,
    pub headers: Headers,
    pub content_length: usize,
}

impl RequestHead {
    pub fn into_request(self, body: Vec<u8>) -> Request {
        Request {
            method: self.line.method,
            target: self.line.target,
            path: self.line.decoded.path,
            query: self.line.decoded.query,
            version: self.line.version,
            headers: self.headers,
            body,
        }
    }
}

/// Parses the request line once its CRLF has arrived.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    let line_end = match find(buf, b"\r\n") {
        Some(end) => end,
        None if buf.len() > MAX_HEAD_BYTES => return Err(ParseError::HeadersTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    let line = std::str::from_utf8(&buf[..line_end])
        .map_err(|_| ParseError::InvalidRequest)?;

    let mut parts = line.split(' ');

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let target = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if parts.next().is_some() || target.is_empty() {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    if version != "HTTP/1.1" && version != "HTTP/1.0" {
        return Err(ParseError::InvalidVersion);
    }

    let decoded = decode_target(target).map_err(|_| ParseError::InvalidTarget)?;

    Ok(RequestLine {
        method,
        target: target.to_string(),
        decoded,
        version: version.to_string(),
    })
}

/// Parses the request line and headers. Returns the head and the number of
/// bytes it occupied, including the blank line.
pub fn parse_request_head(buf: &[u8]) -> Result<(RequestHead, usize), ParseError> {
    let line = parse_request_line(buf)?;

    // Look for header/body separator
    let headers_end = match find_headers_end(buf) {
        Some(end) if end + 4 > MAX_HEAD_BYTES => return Err(ParseError::HeadersTooLarge),
        Some(end) => end,
        None if buf.len() > MAX_HEAD_BYTES => return Err(ParseError::HeadersTooLarge),
        None => return Err(ParseError::Incomplete),
    };

    let headers_str = std::str::from_utf8(&buf[..headers_end])
        .map_err(|_| ParseError::InvalidHeader)?;

    let mut headers = Headers::new();

    // First line was handled above
    for line in headers_str.split("\r\n").skip(1) {
        if line.starts_with([' ', '\t']) {
            return Err(ParseError::InvalidHeader);
        }

        let (key, value) = line
            .split_once(':')
            .ok_or(ParseError::InvalidHeader)?;

        if !is_token(key) {
            return Err(ParseError::InvalidHeader);
        }

        headers.append(key, value.trim());
    }

    if headers.contains("Transfer-Encoding") {
        return Err(ParseError::UnsupportedTransferEncoding);
    }

    let content_length = content_length(&headers)?;

    Ok((
        RequestHead {
            line,
            headers,
            content_length,
        },
        headers_end + 4,
    ))
}

/// Parses a complete request, body included.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let (head, head_len) = parse_request_head(buf)?;
    let body_bytes = &buf[head_len..];

    if body_bytes.len() < head.content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..head.content_length].to_vec();
    let total_consumed = head_len + head.content_length;

    Ok((head.into_request(body), total_consumed))
}

/// Every Content-Length field must carry the same plain decimal value.
fn content_length(headers: &Headers) -> Result<usize, ParseError> {
    let mut length = None;

    for value in headers.get_all("Content-Length") {
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidContentLength);
        }
        let parsed = value
            .parse::<usize>()
            .map_err(|_| ParseError::InvalidContentLength)?;

        match length {
            Some(previous) if previous != parsed => {
                return Err(ParseError::InvalidContentLength);
            }
            _ => length = Some(parsed),
        }
    }

    Ok(length.unwrap_or(0))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    find(buf, b"\r\n\r\n")
}

fn find(buf: &[u8], needle: &[u8]) -> Option<usize> {
    buf.windows(needle.len())
        .position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/");
        assert_eq!(parsed.header("host"), Some("example.com"));
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn request_line_needs_its_crlf() {
        assert_eq!(
            parse_request_line(b"GET / HTTP/1.1").unwrap_err(),
            ParseError::Incomplete
        );
        assert!(parse_request_line(b"GET / HTTP/1.1\r\n").is_ok());
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut req = b"GET / HTTP/1.1\r\nX-Fill: ".to_vec();
        req.extend(std::iter::repeat_n(b'a', MAX_HEAD_BYTES));
        assert_eq!(
            parse_request_head(&req).unwrap_err(),
            ParseError::HeadersTooLarge
        );
    }
}
