//! Response builders. Every body is sent with an explicit `Content-Length`,
//! which axum keeps on `HEAD` responses after dropping the body.

use axum::{
    body::{Body, Bytes},
    http::{HeaderValue, StatusCode, header},
    response::Response,
};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_TEXT: &str = "text/plain";

pub fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> Response {
    let body = body.into();
    let length = body.len();
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

pub fn json(body: String) -> Response {
    with_body(StatusCode::OK, CONTENT_TYPE_JSON, body)
}

pub fn plain_text(status: StatusCode, body: impl Into<Bytes>) -> Response {
    with_body(status, CONTENT_TYPE_TEXT, body)
}
