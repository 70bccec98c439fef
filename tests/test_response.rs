use picohttpd::http::response::{
    DEFAULT_CONTENT_TYPE, HTML_CONTENT_TYPE, Response, ResponseBuilder, StatusCode,
};
use picohttpd::http::writer::serialize_response;

#[test]
fn test_status_code_as_u16() {
    assert_eq!(StatusCode::Ok.as_u16(), 200);
    assert_eq!(StatusCode::Created.as_u16(), 201);
    assert_eq!(StatusCode::BadRequest.as_u16(), 400);
    assert_eq!(StatusCode::NotFound.as_u16(), 404);
    assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    assert_eq!(StatusCode::InternalServerError.as_u16(), 500);
}

#[test]
fn test_status_code_reason_phrase() {
    assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    assert_eq!(StatusCode::Created.reason_phrase(), "Created");
    assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    assert_eq!(
        StatusCode::MethodNotAllowed.reason_phrase(),
        "Method Not Allowed"
    );
    assert_eq!(
        StatusCode::InternalServerError.reason_phrase(),
        "Internal Server Error"
    );
}

#[test]
fn test_status_code_display_matches_status_line() {
    assert_eq!(StatusCode::NotFound.to_string(), "404 Not Found");
    assert_eq!(StatusCode::Ok.to_string(), "200 OK");
}

#[test]
fn test_error_body_layout() {
    let body = String::from_utf8(Response::bad_request("bad header").body).unwrap();
    assert_eq!(body, "400 Bad Request\r\n\r\nbad header\r\n");
}

#[test]
fn test_response_html_helper() {
    let response = Response::html("<p>hi</p>");

    assert_eq!(response.headers.get("Content-Type"), Some(HTML_CONTENT_TYPE));
    assert_eq!(response.headers.get("Content-Length"), Some("9"));
}

#[test]
fn test_response_builder_basic() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(b"Hello, World!".to_vec())
        .build();

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"Hello, World!".to_vec());
    assert_eq!(response.headers.get("Content-Type"), Some(DEFAULT_CONTENT_TYPE));
}

#[test]
fn test_response_builder_with_headers() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", "text/html")
        .header("X-Custom", "value")
        .body(b"test".to_vec())
        .build();

    assert_eq!(response.headers.get("Content-Type"), Some("text/html"));
    assert_eq!(response.headers.get("x-custom"), Some("value"));
}

#[test]
fn test_response_builder_auto_content_length() {
    let body = b"This is the body".to_vec();
    let response = ResponseBuilder::new(StatusCode::Ok)
        .body(body.clone())
        .build();

    let content_length = response.headers.get("Content-Length").unwrap();
    assert_eq!(content_length, body.len().to_string());
}

#[test]
fn test_response_builder_overrides_preset_content_length() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Length", "999")
        .body(b"test".to_vec())
        .build();

    // Always derived from the body
    assert_eq!(response.headers.get("Content-Length"), Some("4"));
    assert_eq!(response.headers.get_all("Content-Length").count(), 1);
}

#[test]
fn test_response_builder_header_replaces() {
    let response = ResponseBuilder::new(StatusCode::Ok)
        .header("X-Frame-Options", "SAMEORIGIN")
        .header("x-frame-options", "DENY")
        .build();

    assert_eq!(response.headers.get_all("X-Frame-Options").count(), 1);
    assert_eq!(response.headers.get("X-Frame-Options"), Some("DENY"));
    assert_eq!(response.headers.len(), 3); // 1 custom + Content-Type + Content-Length
}

#[test]
fn test_response_builder_empty_body() {
    let response = ResponseBuilder::new(StatusCode::Ok).build();

    assert_eq!(response.body.len(), 0);
    assert_eq!(response.headers.get("Content-Length"), Some("0"));
}

#[test]
fn test_response_ok_helper() {
    let response = Response::ok(b"test content".to_vec());

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"test content".to_vec());
}

#[test]
fn test_response_not_found_helper() {
    let response = Response::not_found();

    assert_eq!(response.status, StatusCode::NotFound);
    assert!(String::from_utf8_lossy(&response.body).contains("File not found"));
}

#[test]
fn test_response_method_not_allowed_helper() {
    let response = Response::method_not_allowed();

    assert_eq!(response.status, StatusCode::MethodNotAllowed);
    assert_eq!(response.headers.get("Allow"), Some("GET, POST"));
}

#[test]
fn test_response_internal_error_helper() {
    let response = Response::internal_error();

    assert_eq!(response.status, StatusCode::InternalServerError);
    assert!(String::from_utf8_lossy(&response.body).starts_with("500 Internal Server Error"));
}

#[test]
fn test_serialize_response_layout() {
    let response = ResponseBuilder::new(StatusCode::Created)
        .header("Content-Type", "text/plain")
        .header("X-Trace", "abc")
        .body("done")
        .build();

    let wire = serialize_response(&response);
    assert_eq!(
        &wire[..],
        &b"HTTP/1.1 201 Created\r\n\
          Content-Type: text/plain\r\n\
          X-Trace: abc\r\n\
          Content-Length: 4\r\n\
          \r\n\
          done"[..]
    );
}
