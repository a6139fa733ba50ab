//! Global method gate.
//!
//! Runs before routing, so the answer is the same for every path: `GET` and
//! `HEAD` pass through, `OPTIONS` is answered with the allowed methods, and
//! anything else gets a 405.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::error::{ALLOWED_METHODS, ApiError};

pub async fn method_gate(request: Request, next: Next) -> Response {
    match *request.method() {
        Method::GET | Method::HEAD => next.run(request).await,
        Method::OPTIONS => options_response(),
        _ => {
            tracing::debug!(method = %request.method(), "Method not allowed");
            ApiError::method_not_allowed().into_response()
        }
    }
}

fn options_response() -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|| async { "ok" }))
            .fallback(|| async { ApiError::not_found() })
            .layer(middleware::from_fn(method_gate))
    }

    async fn call(method: Method, uri: &str) -> Response {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app().oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_passes_through() {
        assert_eq!(call(Method::GET, "/").await.status(), StatusCode::OK);
        assert_eq!(call(Method::GET, "/missing").await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_options_on_any_path() {
        for uri in ["/", "/missing"] {
            let response = call(Method::OPTIONS, uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::ALLOW], ALLOWED_METHODS);
            let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn test_other_methods_rejected_on_any_path() {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            for uri in ["/", "/missing"] {
                let response = call(method.clone(), uri).await;
                assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
                assert_eq!(response.headers()[header::ALLOW], ALLOWED_METHODS);
            }
        }
    }
}
