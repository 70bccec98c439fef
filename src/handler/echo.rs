//! Diagnostic responses that reflect the request back to the client.
//!
//! Nothing here touches the filesystem.

use std::fmt::Write;

use crate::http::request::Request;
use crate::http::response::Response;

/// Lists the method, decoded path, raw query and every header received,
/// one header occurrence per line in arrival order.
pub fn headers(req: &Request) -> Response {
    let mut body = String::new();

    let _ = writeln!(body, "Request method: {}", req.method);
    let _ = writeln!(body, "Request path: {}", req.path);
    let _ = writeln!(body, "Query string: {}", req.query);
    body.push_str("\nList of request headers:\n\n");

    for (name, value) in req.headers.iter() {
        let _ = writeln!(body, "{}: {}", name, value);
    }

    Response::ok(body)
}

/// Acknowledges a POST by reporting how many body bytes arrived.
pub fn post(req: &Request) -> Response {
    Response::ok(format!(
        "Received POST of {} bytes at {}.\n",
        req.body.len(),
        req.path
    ))
}
