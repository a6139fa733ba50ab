//! API error handling.
//!
//! Every error is answered with a short plain-text body naming the status.
//! The detailed reason only goes to the log.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tube_extractor::ExtractorError;

use super::response::plain_text;
use crate::codec::PageTokenError;

/// Value of the `Allow` header on `OPTIONS` and 405 responses.
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub reason: String,
}

impl ApiError {
    pub fn new(status: StatusCode, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, reason)
    }

    /// Create a 404 Not Found error.
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "no such route")
    }

    /// Create a 405 Method Not Allowed error.
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
    }

    /// Create a 500 Internal Server Error.
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, reason)
    }

    /// Body text, e.g. `400 Bad Request`.
    pub fn body(&self) -> String {
        format!(
            "{} {}",
            self.status.as_u16(),
            self.status.canonical_reason().unwrap_or("Error")
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = plain_text(self.status, self.body());
        if self.status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        response
    }
}

impl From<ExtractorError> for ApiError {
    fn from(err: ExtractorError) -> Self {
        // Logged inside the request span, which carries method and uri.
        tracing::error!(error = %err, "Metadata provider request failed");
        ApiError::internal(err.to_string())
    }
}

impl From<PageTokenError> for ApiError {
    fn from(err: PageTokenError) -> Self {
        tracing::debug!(error = %err, "Rejected page token");
        ApiError::bad_request(err.to_string())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
