//! Request-target decoding.
//!
//! The raw target is percent-decoded as a whole before the query string is
//! cut off, so the decoded `path` never contains a `?`. The `query` is kept
//! exactly as the client sent it.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when a file name is placed into a URL path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetError {
    /// The target does not start with `/`.
    NotOriginForm,
    /// A `%` is not followed by two hex digits.
    InvalidEscape,
    /// The decoded bytes are not UTF-8.
    InvalidUtf8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTarget {
    pub path: String,
    pub query: String,
}

pub fn decode_target(raw: &str) -> Result<DecodedTarget, TargetError> {
    if !raw.starts_with('/') {
        return Err(TargetError::NotOriginForm);
    }

    check_escapes(raw)?;

    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| TargetError::InvalidUtf8)?;

    let path = match decoded.split_once('?') {
        Some((path, _)) => path.to_string(),
        None => decoded.into_owned(),
    };

    let query = raw
        .split_once('?')
        .map(|(_, q)| q.to_string())
        .unwrap_or_default();

    Ok(DecodedTarget { path, query })
}

/// `percent_decode_str` passes malformed escapes through untouched; we
/// refuse them instead.
fn check_escapes(raw: &str) -> Result<(), TargetError> {
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return Err(TargetError::InvalidEscape);
            }
            i += 3;
        } else {
            i += 1;
        }
    }

    Ok(())
}

/// Percent-encodes a single path segment, such as a file name in a
/// directory listing link.
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}
