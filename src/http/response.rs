use std::fmt;

use crate::http::headers::Headers;

pub const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Status codes the server can answer with.
///
/// `Created` is never produced by the router; POST is acknowledged with
/// `Ok`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    Created,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl StatusCode {
    const fn parts(self) -> (u16, &'static str) {
        match self {
            StatusCode::Ok => (200, "OK"),
            StatusCode::Created => (201, "Created"),
            StatusCode::BadRequest => (400, "Bad Request"),
            StatusCode::NotFound => (404, "Not Found"),
            StatusCode::MethodNotAllowed => (405, "Method Not Allowed"),
            StatusCode::InternalServerError => (500, "Internal Server Error"),
        }
    }

    /// ```
    /// # use picohttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        self.parts().0
    }

    /// ```
    /// # use picohttpd::http::response::StatusCode;
    /// assert_eq!(StatusCode::MethodNotAllowed.reason_phrase(), "Method Not Allowed");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        self.parts().1
    }
}

/// Formats as it appears on the status line, e.g. `404 Not Found`.
impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (code, reason) = self.parts();
        write!(f, "{} {}", code, reason)
    }
}

/// A response ready for the writer. Built through [`ResponseBuilder`] so
/// that `Content-Length` always matches `body`.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    /// Written in this order.
    pub headers: Headers,
    pub body: Vec<u8>,
}

pub struct ResponseBuilder {
    status: StatusCode,
    headers: Headers,
    body: Vec<u8>,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    /// Sets a header, replacing any earlier value under the same name.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn content_type(self, value: &str) -> Self {
        self.header("Content-Type", value)
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Finishes the response. `Content-Length` is derived from the body,
    /// overwriting anything set by hand, and `Content-Type` falls back to
    /// [`DEFAULT_CONTENT_TYPE`].
    pub fn build(mut self) -> Response {
        if !self.headers.contains("Content-Type") {
            self.headers.insert("Content-Type", DEFAULT_CONTENT_TYPE);
        }
        self.headers
            .insert("Content-Length", self.body.len().to_string());

        Response {
            status: self.status,
            headers: self.headers,
            body: self.body,
        }
    }
}

impl Response {
    /// 200 with a plain text body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok).body(body).build()
    }

    /// 200 with an HTML body.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .content_type(HTML_CONTENT_TYPE)
            .body(body)
            .build()
    }

    /// Missing files and refused paths share this exact response.
    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound, "File not found.")
    }

    pub fn bad_request(detail: &str) -> Self {
        Self::error(StatusCode::BadRequest, detail)
    }

    pub fn method_not_allowed() -> Self {
        let mut response = Self::error(
            StatusCode::MethodNotAllowed,
            "Only GET and POST are supported.",
        );
        response.headers.insert("Allow", "GET, POST");
        response
    }

    pub fn internal_error() -> Self {
        Self::error(
            StatusCode::InternalServerError,
            "The server failed to complete the request.",
        )
    }

    fn error(status: StatusCode, detail: &str) -> Self {
        ResponseBuilder::new(status)
            .body(format!("{}\r\n\r\n{}\r\n", status, detail))
            .build()
    }
}
