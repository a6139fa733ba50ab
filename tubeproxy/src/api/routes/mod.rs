//! API route modules.

pub mod assets;
pub mod channel;
pub mod playlist;
pub mod search;
pub mod stream;
pub mod trending;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use tube_extractor::{MetadataProvider, Page};

use super::error::{ApiError, ApiResult};
use super::middleware::{decode_path, method_gate};
use super::query::QueryParams;
use super::server::AppState;
use crate::codec::{PageKind, PageToken};

/// Create the router with every route, the 404 fallback and the method gate.
///
/// Routing runs inside a fallback service so the path is decoded before any
/// route is matched.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/search", get(search::search))
        .route("/stream", get(stream::stream))
        .route("/channel", get(channel::channel))
        .route("/playlist", get(playlist::playlist))
        .route("/trending", get(trending::trending))
        .route("/robots.txt", get(assets::robots_txt))
        .route("/favicon.ico", get(assets::favicon_ico))
        .fallback(not_found)
        .with_state(state);

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn(decode_path))
        .layer(middleware::from_fn(method_gate))
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}

/// Provider named by the `t` parameter.
fn resolve_service(state: &AppState, params: &QueryParams) -> ApiResult<Arc<dyn MetadataProvider>> {
    let raw = params.get("t");
    state
        .registry
        .resolve(raw)
        .ok_or_else(|| ApiError::bad_request(format!("unknown service '{}'", raw.unwrap_or(""))))
}

/// Decodes a `p` token and checks it was issued by `service` for the same
/// listing (`kind` and `scope`).
fn decode_page(
    token: &str,
    service: &dyn MetadataProvider,
    kind: PageKind,
    scope: Option<&str>,
) -> ApiResult<Page> {
    let token = PageToken::decode(token)?;
    if !token.issued_for(service.service_id(), kind, scope) {
        tracing::debug!(
            issued_service = token.service_id,
            issued_kind = ?token.kind,
            service = service.service_id(),
            kind = ?kind,
            "Page token used outside the listing that issued it"
        );
        return Err(ApiError::bad_request("page token issued for another listing"));
    }
    Ok(token.page)
}

fn next_page_token(
    service: &dyn MetadataProvider,
    kind: PageKind,
    scope: Option<&str>,
    page: Option<&Page>,
) -> Option<String> {
    page.map(|p| {
        let token = PageToken::new(service.service_id(), kind, p.clone());
        match scope {
            Some(scope) => token.with_scope(scope),
            None => token,
        }
        .encode()
    })
}
