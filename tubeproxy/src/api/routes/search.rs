use axum::{
    extract::{RawQuery, State},
    response::Response,
};
use tube_extractor::SearchQuery;

use super::{decode_page, next_page_token, resolve_service};
use crate::api::error::ApiResult;
use crate::api::query::QueryParams;
use crate::api::response;
use crate::api::server::AppState;
use crate::codec::{PageKind, json};

/// `GET /search?q=&t=&f=&p=&s=`
pub async fn search(State(state): State<AppState>, RawQuery(raw): RawQuery) -> ApiResult<Response> {
    let params = QueryParams::parse(raw.as_deref());
    let query = params.require("q")?;
    let service = resolve_service(&state, &params)?;
    let search = SearchQuery::new(query, params.get("f"), params.get("s"));
    // Cursors are bound to the result type, not the terms.
    let scope = search.content_filters.join(",");

    let body = match params.non_empty("p") {
        None => {
            let info = service.search_first_page(&search).await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Search,
                Some(&scope),
                info.page.next_page.as_ref(),
            );
            json::search_info(&info, token.as_deref())
        }
        Some(p) => {
            let page = decode_page(p, service.as_ref(), PageKind::Search, Some(&scope))?;
            let items = service.search_next_page(&search, &page).await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Search,
                Some(&scope),
                items.next_page.as_ref(),
            );
            json::items_page(&items, token.as_deref())
        }
    };
    Ok(response::json(body))
}
