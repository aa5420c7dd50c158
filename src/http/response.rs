//! HTTP response building module
//!
//! Builders for the handful of responses the server produces, decoupled from
//! specific business logic.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::{Response, StatusCode};

pub type HttpResponse = Response<Full<Bytes>>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";

fn build(status: StatusCode, content_type: Option<&'static str>, body: Bytes) -> HttpResponse {
    let len = body.len();
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    if let Some(content_type) = content_type {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    headers.insert(CONTENT_LENGTH, HeaderValue::from(len));
    response
}

/// Plain-text response with a fixed body
pub fn build_text_response(status: StatusCode, body: &'static str) -> HttpResponse {
    build(status, Some(TEXT_PLAIN), Bytes::from_static(body.as_bytes()))
}

/// Response carrying only a status line and headers
pub fn build_empty_response(status: StatusCode) -> HttpResponse {
    build(status, None, Bytes::new())
}

/// 200 OK with an HTML document
pub fn build_html_response(content: Vec<u8>) -> HttpResponse {
    build(StatusCode::OK, Some(TEXT_HTML), Bytes::from(content))
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response listing the accepted methods
pub fn build_405_response(allow: &str) -> HttpResponse {
    let mut response =
        build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    if let Ok(value) = HeaderValue::from_str(allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

/// Drop the body of a GET response so it can answer a HEAD request.
/// `Content-Length` is kept so clients still see the size.
pub fn strip_body(response: HttpResponse) -> HttpResponse {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Full::new(Bytes::new()))
}
