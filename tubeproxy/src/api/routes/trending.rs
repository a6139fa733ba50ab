use axum::{
    extract::{RawQuery, State},
    response::Response,
};

use super::{decode_page, next_page_token, resolve_service};
use crate::api::error::ApiResult;
use crate::api::query::QueryParams;
use crate::api::response;
use crate::api::server::AppState;
use crate::codec::{PageKind, json};

/// `GET /trending?t=&p=`
pub async fn trending(State(state): State<AppState>, RawQuery(raw): RawQuery) -> ApiResult<Response> {
    let params = QueryParams::parse(raw.as_deref());
    let service = resolve_service(&state, &params)?;

    let body = match params.non_empty("p") {
        None => {
            let info = service.trending_first_page().await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Trending,
                None,
                info.page.next_page.as_ref(),
            );
            json::kiosk_info(&info, token.as_deref())
        }
        Some(p) => {
            let page = decode_page(p, service.as_ref(), PageKind::Trending, None)?;
            let items = service.trending_next_page(&page).await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Trending,
                None,
                items.next_page.as_ref(),
            );
            json::items_page(&items, token.as_deref())
        }
    };
    Ok(response::json(body))
}
