use std::fmt;

use crate::http::headers::Headers;
use crate::http::target::decode_target;

/// HTTP request methods.
///
/// Represents the HTTP method/verb of a request. Only `GET` and `POST` are
/// routed; everything else parses and is answered with 405 Method Not
/// Allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a file, listing or echo
    GET,
    /// POST - Submit a body; acknowledged with its byte count
    POST,
    /// PUT - Replace a resource (not routed)
    PUT,
    /// DELETE - Delete a resource (not routed)
    DELETE,
    /// HEAD - Like GET but without the response body (not routed)
    HEAD,
    /// OPTIONS - Describe communication options (not routed)
    OPTIONS,
    /// PATCH - Partial modification of a resource (not routed)
    PATCH,
    /// Any other well-formed token, kept verbatim
    Extension(String),
}

impl Method {
    /// Parses a method token. Matching is case-sensitive, so `get` is an
    /// extension method rather than `GET`.
    ///
    /// ```
    /// # use picohttpd::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), Some(Method::Extension("get".into())));
    /// assert_eq!(Method::from_str("GE T"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let method = match s {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "HEAD" => Method::HEAD,
            "OPTIONS" => Method::OPTIONS,
            "PATCH" => Method::PATCH,
            other if is_token(other) => Method::Extension(other.to_string()),
            _ => return None,
        };
        Some(method)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
            Method::Extension(s) => s,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for a non-empty RFC 9110 `token`, the grammar shared by method and
/// header names.
pub fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Represents a parsed HTTP request from a client.
///
/// Contains everything extracted from the request line, the header block
/// and the body. Lives for a single dispatch and is dropped before the next
/// request on the connection is read.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request target exactly as received (e.g., "/a%20b?x=1")
    pub target: String,
    /// Percent-decoded path with the query cut off (e.g., "/a b")
    pub path: String,
    /// Raw text after the first `?` of `target`, empty when there is none
    pub query: String,
    /// HTTP version, "HTTP/1.1" or "HTTP/1.0"
    pub version: String,
    /// Request headers in arrival order, duplicates included
    pub headers: Headers,
    /// Exactly `Content-Length` bytes, empty if the header was absent
    pub body: Vec<u8>,
}

impl Request {
    /// Retrieves a header value by name, case-insensitively.
    ///
    /// # Arguments
    ///
    /// * `key` - Header name to look up
    ///
    /// # Returns
    ///
    /// `Some(&str)` with the first value if present, `None` otherwise.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key)
    }

    /// Whether the connection stays open after this request is answered.
    ///
    /// HTTP/1.0 closes unless the client sent `Connection: keep-alive`;
    /// HTTP/1.1 stays open unless it sent `Connection: close`.
    pub fn keep_alive(&self) -> bool {
        match (self.version.as_str(), self.header("Connection")) {
            ("HTTP/1.0", value) => value.is_some_and(|v| v.eq_ignore_ascii_case("keep-alive")),
            (_, value) => !value.is_some_and(|v| v.eq_ignore_ascii_case("close")),
        }
    }
}

/// Builds requests outside the parser, mostly for handler tests. The
/// target is decoded the same way the parser decodes it.
#[derive(Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    target: Option<String>,
    version: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a header; repeated names are all kept.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(key, value);
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        let method = self.method.ok_or("method missing")?;
        let target = self.target.ok_or("target missing")?;
        let decoded = decode_target(&target).map_err(|_| "invalid target")?;

        Ok(Request {
            method,
            target,
            path: decoded.path,
            query: decoded.query,
            version: self.version.unwrap_or_else(|| "HTTP/1.1".to_string()),
            headers: self.headers,
            body: self.body,
        })
    }
}
