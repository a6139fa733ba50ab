//! End-to-end tests of the gateway router against stub providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request as HttpRequest, StatusCode, header};
use tower::ServiceExt;
use tube_extractor::media::{
    ChannelInfo, Image, InfoItem, ItemsPage, KioskInfo, PlaylistInfo, SearchInfo, StreamDetail,
    StreamInfoItem, StreamType,
};
use tube_extractor::{ExtractorError, MetadataProvider, Page, SearchQuery, ServiceRegistry};
use tubeproxy::api::{ApiServer, ApiServerConfig, AppState};
use tubeproxy::codec::{PageKind, PageToken};

const NEXT_URL: &str = "https://stub.example/api/v1/videos?start=12";

#[derive(Default)]
struct Recorded {
    query: Option<SearchQuery>,
    page: Option<Page>,
    url: Option<String>,
}

/// Answers every operation with one stream item. Trending first pages
/// carry a next page.
struct StubProvider {
    id: u32,
    title: String,
    recorded: Mutex<Recorded>,
}

impl StubProvider {
    fn new(id: u32, title: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    fn item(&self) -> InfoItem {
        StreamInfoItem {
            url: "https://stub.example/w/1".to_string(),
            name: self.title.clone(),
            thumbnails: vec![Image::unknown_size("https://stub.example/t.jpg")],
            stream_type: StreamType::VideoStream,
            duration: 90,
            view_count: 3,
            ..Default::default()
        }
        .into()
    }

    fn page(&self, next: Option<Page>) -> ItemsPage {
        ItemsPage::new(vec![self.item()], next)
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn service_id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        "stub"
    }

    async fn search_first_page(&self, query: &SearchQuery) -> Result<SearchInfo, ExtractorError> {
        self.recorded.lock().unwrap().query = Some(query.clone());
        Ok(SearchInfo {
            id: query.query.clone(),
            url: "https://stub.example/search".to_string(),
            name: query.query.clone(),
            service_id: self.id,
            sort_filter: Some(query.sort_filter.clone()),
            search_string: query.query.clone(),
            page: self.page(None),
            ..Default::default()
        })
    }

    async fn search_next_page(
        &self,
        query: &SearchQuery,
        page: &Page,
    ) -> Result<ItemsPage, ExtractorError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.query = Some(query.clone());
        recorded.page = Some(page.clone());
        Ok(self.page(None))
    }

    async fn stream_detail(&self, url: &str) -> Result<StreamDetail, ExtractorError> {
        self.recorded.lock().unwrap().url = Some(url.to_string());
        Ok(StreamDetail {
            id: "1".to_string(),
            url: url.to_string(),
            name: self.title.clone(),
            service_id: self.id,
            tags: vec!["a".to_string(), "b".to_string()],
            stream_type: StreamType::VideoStream,
            related_items: vec![self.item()],
            ..Default::default()
        })
    }

    async fn channel_detail(&self, url: &str) -> Result<ChannelInfo, ExtractorError> {
        Ok(ChannelInfo {
            id: "c".to_string(),
            url: url.to_string(),
            name: self.title.clone(),
            service_id: self.id,
            ..Default::default()
        })
    }

    async fn playlist_first_page(&self, url: &str) -> Result<PlaylistInfo, ExtractorError> {
        Ok(PlaylistInfo {
            id: "p".to_string(),
            url: url.to_string(),
            name: self.title.clone(),
            service_id: self.id,
            stream_count: 1,
            page: self.page(Some(Page::from_url(NEXT_URL))),
            ..Default::default()
        })
    }

    async fn playlist_next_page(&self, url: &str, page: &Page) -> Result<ItemsPage, ExtractorError> {
        let mut recorded = self.recorded.lock().unwrap();
        recorded.url = Some(url.to_string());
        recorded.page = Some(page.clone());
        Ok(self.page(None))
    }

    async fn trending_first_page(&self) -> Result<KioskInfo, ExtractorError> {
        Ok(KioskInfo {
            id: "Trending".to_string(),
            url: "https://stub.example/trending".to_string(),
            name: "Trending".to_string(),
            service_id: self.id,
            sort_filter: None,
            page: self.page(Some(Page::from_url(NEXT_URL).with_id("cursor"))),
        })
    }

    async fn trending_next_page(&self, page: &Page) -> Result<ItemsPage, ExtractorError> {
        self.recorded.lock().unwrap().page = Some(page.clone());
        Ok(self.page(None))
    }
}

/// Fails every operation.
struct FailingProvider;

#[async_trait]
impl MetadataProvider for FailingProvider {
    fn service_id(&self) -> u32 {
        1
    }

    fn name(&self) -> &str {
        "failing"
    }

    async fn search_first_page(&self, _: &SearchQuery) -> Result<SearchInfo, ExtractorError> {
        Err(ExtractorError::Other("upstream exploded".to_string()))
    }

    async fn search_next_page(&self, _: &SearchQuery, _: &Page) -> Result<ItemsPage, ExtractorError> {
        Err(ExtractorError::Other("upstream exploded".to_string()))
    }

    async fn stream_detail(&self, url: &str) -> Result<StreamDetail, ExtractorError> {
        Err(ExtractorError::InvalidUrl(url.to_string()))
    }

    async fn channel_detail(&self, _: &str) -> Result<ChannelInfo, ExtractorError> {
        Err(ExtractorError::ContentNotAvailable)
    }

    async fn playlist_first_page(&self, _: &str) -> Result<PlaylistInfo, ExtractorError> {
        Err(ExtractorError::ContentNotAvailable)
    }

    async fn playlist_next_page(&self, _: &str, _: &Page) -> Result<ItemsPage, ExtractorError> {
        Err(ExtractorError::ContentNotAvailable)
    }

    async fn trending_first_page(&self) -> Result<KioskInfo, ExtractorError> {
        Err(ExtractorError::UnexpectedStatus {
            status: 503,
            url: "https://stub.example".to_string(),
        })
    }

    async fn trending_next_page(&self, _: &Page) -> Result<ItemsPage, ExtractorError> {
        Err(ExtractorError::ContentNotAvailable)
    }
}

fn setup(title: &str) -> (Router, Arc<StubProvider>) {
    let stub = Arc::new(StubProvider::new(0, title));
    let registry = ServiceRegistry::new(vec![
        stub.clone() as Arc<dyn MetadataProvider>,
        Arc::new(FailingProvider) as Arc<dyn MetadataProvider>,
    ]);
    let server = ApiServer::new(ApiServerConfig::default(), AppState::new(registry));
    (server.build_router(), stub)
}

fn app() -> Router {
    setup("lofi beats").0
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, HeaderMap, String) {
    let request = HttpRequest::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&body).into_owned())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, HeaderMap, String) {
    send(app, Method::GET, uri).await
}

fn parse(body: &str) -> serde_json::Value {
    serde_json::from_str(body).unwrap()
}

const PATHS: [&str; 8] = [
    "/search",
    "/stream",
    "/channel",
    "/playlist",
    "/trending",
    "/robots.txt",
    "/favicon.ico",
    "/nope",
];

#[tokio::test]
async fn test_unsupported_methods_get_405_everywhere() {
    let app = app();
    for path in PATHS {
        for method in [Method::POST, Method::PUT, Method::DELETE, Method::PATCH] {
            let (status, headers, body) = send(&app, method, path).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{path}");
            assert_eq!(headers[header::ALLOW], "GET, HEAD, OPTIONS");
            assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
            assert!(!body.is_empty());
        }
    }
}

#[tokio::test]
async fn test_options_everywhere() {
    let app = app();
    for path in PATHS {
        let (status, headers, body) = send(&app, Method::OPTIONS, path).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(headers[header::ALLOW], "GET, HEAD, OPTIONS");
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_missing_required_parameters() {
    let app = app();
    for uri in [
        "/search",
        "/search?q=",
        "/search?t=0",
        "/stream",
        "/stream?u=",
        "/channel?t=0",
        "/playlist",
    ] {
        let (status, headers, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body, "400 Bad Request");
    }
}

#[tokio::test]
async fn test_service_id_resolution() {
    let app = app();
    for uri in [
        "/trending?t=999999",
        "/trending?t=abc",
        "/trending?t=-1",
        "/trending?t=2",
        "/trending?t=99999999999",
        "/search?q=x&t=7",
    ] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
    for uri in ["/trending", "/trending?t=", "/trending?t=0", "/trending?t=%2B0"] {
        let (status, _, _) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
    }
}

#[tokio::test]
async fn test_search_first_page() {
    let (app, stub) = setup("lofi beats");
    let (status, headers, body) = get(&app, "/search?q=lofi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::CONTENT_LENGTH], body.len().to_string().as_str());
    assert!(body.contains(r#""nextPageToken":null"#));

    let json = parse(&body);
    assert_eq!(json["query"], "lofi");
    assert_eq!(json["sort"], "relevance");
    assert_eq!(json["service"], 0);
    assert_eq!(json["corrected"], false);
    assert!(json["suggestion"].is_null());
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["type"], "stream");
    assert_eq!(results[0]["stream"], "video");
    assert_eq!(results[0]["thumbnails"][0]["width"], -1);

    let recorded = stub.recorded.lock().unwrap();
    let query = recorded.query.as_ref().unwrap();
    assert_eq!(query.content_filters, vec!["videos"]);
}

#[tokio::test]
async fn test_search_query_decoding() {
    let (app, stub) = setup("x");
    let (status, _, _) = get(&app, "/search?q=a%20b&f=videos,channels&s=newest").await;
    assert_eq!(status, StatusCode::OK);

    let recorded = stub.recorded.lock().unwrap();
    let query = recorded.query.as_ref().unwrap();
    assert_eq!(query.query, "a b");
    assert_eq!(query.content_filters, vec!["videos", "channels"]);
    assert_eq!(query.sort_filter, "newest");
}

#[tokio::test]
async fn test_head_matches_get() {
    let app = app();
    for uri in ["/search?q=lofi", "/stream?u=https%3A%2F%2Fstub.example%2Fw%2F1", "/robots.txt"] {
        let (get_status, get_headers, get_body) = get(&app, uri).await;
        let (head_status, head_headers, head_body) = send(&app, Method::HEAD, uri).await;
        assert_eq!(head_status, get_status, "{uri}");
        assert_eq!(head_headers[header::CONTENT_TYPE], get_headers[header::CONTENT_TYPE]);
        assert_eq!(
            head_headers[header::CONTENT_LENGTH],
            get_headers[header::CONTENT_LENGTH]
        );
        assert_eq!(
            get_headers[header::CONTENT_LENGTH],
            get_body.len().to_string().as_str()
        );
        assert!(head_body.is_empty());
    }
}

#[tokio::test]
async fn test_json_escaping_end_to_end() {
    let (app, _) = setup("he said \"hi\"\n\u{1}");
    let (status, _, body) = get(&app, "/search?q=x").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#""name":"he said \"hi\"\n\u0001""#));
    assert_eq!(parse(&body)["results"][0]["name"], "he said \"hi\"\n\u{1}");
}

#[tokio::test]
async fn test_stream_channel_playlist_shapes() {
    let (app, stub) = setup("x");

    let (status, _, body) = get(&app, "/stream?u=https%3A%2F%2Fstub.example%2Fw%2F1").await;
    assert_eq!(status, StatusCode::OK);
    let json = parse(&body);
    assert_eq!(json["url"], "https://stub.example/w/1");
    assert_eq!(json["tags"], serde_json::json!(["a", "b"]));
    assert_eq!(json["privacy"], "public");
    assert_eq!(json["uploader"]["subscribers"], 0);
    assert!(json["subchannel"]["url"].is_null());
    assert_eq!(json["audioStreams"], serde_json::json!([]));
    assert_eq!(json["relatedItems"][0]["type"], "stream");
    assert_eq!(
        stub.recorded.lock().unwrap().url.as_deref(),
        Some("https://stub.example/w/1")
    );

    let (status, _, body) = get(&app, "/channel?u=https://stub.example/c/x").await;
    assert_eq!(status, StatusCode::OK);
    let json = parse(&body);
    assert!(json["feed"].is_null());
    assert!(json["parentChannel"]["name"].is_null());

    let (status, _, body) = get(&app, "/playlist?u=https://stub.example/w/p/1").await;
    assert_eq!(status, StatusCode::OK);
    let json = parse(&body);
    assert_eq!(json["playlist"], "normal");
    assert_eq!(json["streams"], 1);
    assert!(json["nextPageToken"].is_string());
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_pagination_round_trip_through_the_router() {
    let (app, stub) = setup("x");
    let (_, _, body) = get(&app, "/trending").await;
    let first = parse(&body);
    let token = first["nextPageToken"].as_str().unwrap().to_string();
    assert_eq!(
        PageToken::decode(&token).unwrap().page,
        Page::from_url(NEXT_URL).with_id("cursor")
    );

    let (status, _, body) = get(&app, &format!("/trending?p={token}")).await;
    assert_eq!(status, StatusCode::OK);
    let next = parse(&body);
    assert!(next["nextPageToken"].is_null());
    assert_eq!(next["results"].as_array().unwrap().len(), 1);
    assert!(next.get("id").is_none());
    assert_eq!(
        stub.recorded.lock().unwrap().page,
        Some(Page::from_url(NEXT_URL).with_id("cursor"))
    );

    let (_, _, body) = get(&app, "/playlist?u=https://stub.example/w/p/1").await;
    let token = parse(&body)["nextPageToken"].as_str().unwrap().to_string();
    let (status, _, body) = get(
        &app,
        &format!("/playlist?u=https://stub.example/w/p/1&p={token}"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let next = parse(&body);
    assert_eq!(next.as_object().unwrap().len(), 2);
    assert!(next["nextPageToken"].is_null());

    let (status, _, _) = get(&app, "/search?q=x&p=").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_bad_page_tokens() {
    let app = app();
    let foreign = PageToken::new(1, PageKind::Trending, Page::from_url(NEXT_URL)).encode();
    for uri in [
        "/trending?p=not-a-real-token".to_string(),
        "/search?q=x&p=%21%21".to_string(),
        format!("/trending?p={foreign}"),
        format!("/playlist?u=https://stub.example/w/p/1&p={}", "A".repeat(20_000)),
    ] {
        let (status, headers, _) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
    }
}

#[tokio::test]
async fn test_page_tokens_only_continue_their_own_listing() {
    let (app, stub) = setup("x");
    let playlist_a = "https://stub.example/w/p/a";

    let (_, _, body) = get(&app, "/trending").await;
    let trending = parse(&body)["nextPageToken"].as_str().unwrap().to_string();
    let (_, _, body) = get(&app, &format!("/playlist?u={playlist_a}")).await;
    let playlist = parse(&body)["nextPageToken"].as_str().unwrap().to_string();
    let search = PageToken::new(0, PageKind::Search, Page::from_url(NEXT_URL))
        .with_scope("videos")
        .encode();

    for uri in [
        format!("/search?q=x&p={trending}"),
        format!("/playlist?u={playlist_a}&p={trending}"),
        format!("/trending?p={playlist}"),
        format!("/playlist?u=https://stub.example/w/p/b&p={playlist}"),
        format!("/trending?p={search}"),
        format!("/playlist?u={playlist_a}&p={search}"),
        format!("/search?q=x&f=channels&p={search}"),
    ] {
        let (status, headers, body) = get(&app, &uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body, "400 Bad Request");
    }
    assert!(stub.recorded.lock().unwrap().page.is_none());

    let (status, _, _) = get(&app, &format!("/search?q=other&p={search}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = get(&app, &format!("/playlist?u={playlist_a}&p={playlist}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_provider_failures_become_500() {
    let app = app();
    for uri in [
        "/search?q=x&t=1",
        "/stream?u=x&t=1",
        "/channel?u=x&t=1",
        "/playlist?u=x&t=1",
        "/trending?t=1",
    ] {
        let (status, headers, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body, "500 Internal Server Error");
    }
}

#[tokio::test]
async fn test_unknown_paths_and_decoded_matching() {
    let app = app();
    for uri in ["/", "/Search?q=x", "/search/?q=x", "/api/search"] {
        let (status, headers, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body, "404 Not Found");
    }
    let (status, _, _) = get(&app, "/s%65arch?q=x").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_static_assets() {
    let app = app();
    let (status, headers, body) = get(&app, "/robots.txt").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(body, "User-agent: *\nDisallow: /\n");

    let (status, headers, _) = get(&app, "/favicon.ico").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/x-icon");
    assert_eq!(headers[header::CONTENT_LENGTH], "1150");
}
