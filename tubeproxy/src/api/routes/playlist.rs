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

/// `GET /playlist?u=&t=&p=`
pub async fn playlist(State(state): State<AppState>, RawQuery(raw): RawQuery) -> ApiResult<Response> {
    let params = QueryParams::parse(raw.as_deref());
    let url = params.require("u")?;
    let service = resolve_service(&state, &params)?;

    let body = match params.non_empty("p") {
        None => {
            let info = service.playlist_first_page(url).await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Playlist,
                Some(url),
                info.page.next_page.as_ref(),
            );
            json::playlist_info(&info, token.as_deref())
        }
        Some(p) => {
            let page = decode_page(p, service.as_ref(), PageKind::Playlist, Some(url))?;
            let items = service.playlist_next_page(url, &page).await?;
            let token = next_page_token(
                service.as_ref(),
                PageKind::Playlist,
                Some(url),
                items.next_page.as_ref(),
            );
            json::items_page(&items, token.as_deref())
        }
    };
    Ok(response::json(body))
}
