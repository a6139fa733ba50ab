use axum::{http::StatusCode, response::Response};

use crate::api::response::{self, CONTENT_TYPE_TEXT};

const ROBOTS_TXT: &str = include_str!("../../../assets/robots.txt");
const FAVICON_ICO: &[u8] = include_bytes!("../../../assets/favicon.ico");

pub async fn robots_txt() -> Response {
    response::with_body(StatusCode::OK, CONTENT_TYPE_TEXT, ROBOTS_TXT)
}

pub async fn favicon_ico() -> Response {
    response::with_body(StatusCode::OK, "image/x-icon", FAVICON_ICO)
}
