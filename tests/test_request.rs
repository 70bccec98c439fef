use picohttpd::http::headers::Headers;
use picohttpd::http::request::{Method, Request, RequestBuilder};

fn request(version: &str, headers: &[(&str, &str)]) -> Request {
    let mut map = Headers::new();
    for (k, v) in headers {
        map.append(*k, *v);
    }

    Request {
        method: Method::GET,
        target: "/".to_string(),
        path: "/".to_string(),
        query: String::new(),
        version: version.to_string(),
        headers: map,
        body: vec![],
    }
}

#[test]
fn test_request_header_retrieval() {
    let req = request(
        "HTTP/1.1",
        &[("Host", "example.com"), ("Content-Type", "application/json")],
    );

    assert_eq!(req.header("Host"), Some("example.com"));
    assert_eq!(req.header("content-type"), Some("application/json"));
    assert_eq!(req.header("Missing"), None);
}

#[test]
fn test_request_header_returns_first_duplicate() {
    let req = request("HTTP/1.1", &[("X-Tag", "a"), ("x-tag", "b")]);

    assert_eq!(req.header("X-TAG"), Some("a"));
    assert_eq!(req.headers.get_all("x-tag").collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn test_request_keep_alive_ignores_other_tokens() {
    assert!(request("HTTP/1.1", &[("Connection", "upgrade")]).keep_alive());
    assert!(!request("HTTP/1.0", &[("Connection", "upgrade")]).keep_alive());
}

#[test]
fn test_request_keep_alive_http11_default() {
    // HTTP/1.1 defaults to keep-alive
    assert!(request("HTTP/1.1", &[]).keep_alive());
}

#[test]
fn test_request_keep_alive_close() {
    assert!(!request("HTTP/1.1", &[("Connection", "close")]).keep_alive());
    assert!(!request("HTTP/1.1", &[("connection", "Close")]).keep_alive());
}

#[test]
fn test_request_keep_alive_http10() {
    // HTTP/1.0 closes unless asked otherwise
    assert!(!request("HTTP/1.0", &[]).keep_alive());
    assert!(request("HTTP/1.0", &[("Connection", "Keep-Alive")]).keep_alive());
}

#[test]
fn test_request_method_from_string() {
    assert_eq!(Method::from_str("GET"), Some(Method::GET));
    assert_eq!(Method::from_str("POST"), Some(Method::POST));
    assert_eq!(
        Method::from_str("get"),
        Some(Method::Extension("get".to_string()))
    ); // Case-sensitive
    assert_eq!(Method::from_str(""), None);
    assert_eq!(Method::from_str("GE T"), None);
}

#[test]
fn test_request_method_display() {
    assert_eq!(Method::POST.to_string(), "POST");
    assert_eq!(Method::Extension("BREW".to_string()).to_string(), "BREW");
}

#[test]
fn test_request_builder_decodes_target() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/a%2Fb/c?x=1")
        .header("X-One", "1")
        .header("X-One", "2")
        .build()
        .unwrap();

    assert_eq!(req.path, "/a/b/c");
    assert_eq!(req.query, "x=1");
    assert_eq!(req.version, "HTTP/1.1");
    assert_eq!(req.headers.get_all("x-one").count(), 2);
}

#[test]
fn test_request_builder_version_override() {
    let req = RequestBuilder::new()
        .method(Method::GET)
        .target("/")
        .version("HTTP/1.0")
        .build()
        .unwrap();

    assert!(!req.keep_alive());
}

#[test]
fn test_request_builder_requires_fields() {
    assert!(RequestBuilder::new().target("/").build().is_err());
    assert!(RequestBuilder::new().method(Method::GET).build().is_err());
    assert!(
        RequestBuilder::new()
            .method(Method::GET)
            .target("/%g0")
            .build()
            .is_err()
    );
}
