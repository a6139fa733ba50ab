use axum::{
    extract::{RawQuery, State},
    response::Response,
};

use super::resolve_service;
use crate::api::error::ApiResult;
use crate::api::query::QueryParams;
use crate::api::response;
use crate::api::server::AppState;
use crate::codec::json;

/// `GET /channel?u=&t=`
pub async fn channel(State(state): State<AppState>, RawQuery(raw): RawQuery) -> ApiResult<Response> {
    let params = QueryParams::parse(raw.as_deref());
    let url = params.require("u")?;
    let service = resolve_service(&state, &params)?;

    let info = service.channel_detail(url).await?;
    Ok(response::json(json::channel_info(&info)))
}
