use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use super::models::{
    ActorImage, ActorSummary, Channel, ListResponse, Playlist, PlaylistElement, Video, VideoFile,
};
use crate::extractor::downloader::Downloader;
use crate::extractor::error::ExtractorError;
use crate::extractor::page::Page;
use crate::extractor::provider::{MetadataProvider, SearchQuery};
use crate::extractor::utils::{capture_group_1_or_invalid_url, join_url};
use crate::media::{
    AudioStream, ChannelInfo, ChannelInfoItem, Image, InfoItem, ItemsPage, KioskInfo,
    PlaylistInfo, PlaylistInfoItem, PlaylistType, Privacy, SearchInfo, StreamDetail,
    StreamInfoItem, StreamType, VideoStream,
};

pub static VIDEO_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/(?:w|videos/watch)/([^/?#]+)/?(?:[?#].*)?$").unwrap()
});

pub static PLAYLIST_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/(?:w/p|videos/watch/playlist)/([^/?#]+)").unwrap()
});

pub static CHANNEL_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^https?://[^/]+/(c|video-channels|a|accounts)/([^/?#]+)").unwrap()
});

const ITEMS_PER_PAGE: i64 = 12;
const TRENDING_KIOSK_ID: &str = "Trending";

/// Provider backed by the REST API of one PeerTube instance.
///
/// Search and trending go to the configured instance. Detail lookups go to
/// the instance that hosts the given url, so federated links resolve at
/// their origin.
pub struct PeerTube {
    service_id: u32,
    name: String,
    base_url: String,
    downloader: Arc<dyn Downloader>,
}

impl PeerTube {
    pub fn new(service_id: u32, base_url: impl Into<String>, downloader: Arc<dyn Downloader>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let name = Url::parse(&base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| format!("PeerTube ({h})")))
            .unwrap_or_else(|| "PeerTube".to_string());
        Self {
            service_id,
            name,
            base_url,
            downloader,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ExtractorError> {
        let response = self.downloader.get(url).await?;
        if response.status == 404 {
            return Err(ExtractorError::ContentNotAvailable);
        }
        if !response.is_success() {
            return Err(ExtractorError::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }
        debug!(url, "PeerTube response received");
        Ok(serde_json::from_str(response.body_or_empty())?)
    }

    /// Origin (`scheme://host[:port]`) of an item url.
    fn origin_of(url: &str) -> Result<String, ExtractorError> {
        let parsed = Url::parse(url).map_err(|_| ExtractorError::InvalidUrl(url.to_string()))?;
        match parsed.origin() {
            origin @ url::Origin::Tuple(..) => Ok(origin.ascii_serialization()),
            url::Origin::Opaque(_) => Err(ExtractorError::InvalidUrl(url.to_string())),
        }
    }

    fn list_url(&self, base: &str, path: &str, params: &[(&str, &str)]) -> Result<Url, ExtractorError> {
        let raw = join_url(base, path);
        let mut url = Url::parse(&raw).map_err(|_| ExtractorError::InvalidUrl(raw.clone()))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("start", "0")
            .append_pair("count", &ITEMS_PER_PAGE.to_string());
        Ok(url)
    }

    /// Rejects cursors that point anywhere but the expected api prefix or
    /// that carry an unusable window.
    fn checked_page_url(page: &Page, expected_prefix: &str) -> Result<Url, ExtractorError> {
        let raw = page
            .url
            .as_deref()
            .ok_or_else(|| ExtractorError::Other("page has no url".to_string()))?;
        if !raw.starts_with(expected_prefix) {
            return Err(ExtractorError::InvalidUrl(raw.to_string()));
        }
        let url = Url::parse(raw).map_err(|_| ExtractorError::InvalidUrl(raw.to_string()))?;
        Self::page_window(&url)?;
        Ok(url)
    }

    /// `(start, start + count)` of a list url. Missing values take the
    /// defaults. A negative start, a non-positive count, an unparsable value
    /// or an overflowing end is invalid.
    fn page_window(url: &Url) -> Result<(i64, i64), ExtractorError> {
        let invalid = || ExtractorError::InvalidUrl(url.to_string());
        let mut start = 0i64;
        let mut count = ITEMS_PER_PAGE;
        for (key, value) in url.query_pairs() {
            match &*key {
                "start" => start = value.parse().map_err(|_| invalid())?,
                "count" => count = value.parse().map_err(|_| invalid())?,
                _ => {}
            }
        }
        if start < 0 || count <= 0 {
            return Err(invalid());
        }
        let end = start.checked_add(count).ok_or_else(invalid)?;
        Ok((start, end))
    }

    /// Cursor for the batch after the one loaded from `url`, if any.
    fn next_page(url: &Url, total: i64) -> Result<Option<Page>, ExtractorError> {
        let (_, next_start) = Self::page_window(url)?;
        if next_start >= total {
            return Ok(None);
        }

        let mut next = url.clone();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| *k != "start")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        next.query_pairs_mut()
            .clear()
            .extend_pairs(pairs)
            .append_pair("start", &next_start.to_string());
        Ok(Some(Page::from_url(next.as_str())))
    }

    fn sort_key(sort: &str) -> &str {
        match sort {
            "relevance" => "-match",
            "date" | "newest" => "-publishedAt",
            "oldest" => "publishedAt",
            "views" => "-views",
            "likes" => "-likes",
            other => other,
        }
    }

    fn search_path(query: &SearchQuery) -> &'static str {
        match query.content_filters.first().map(String::as_str) {
            Some("channels") => "/api/v1/search/video-channels",
            Some("playlists") => "/api/v1/search/video-playlists",
            _ => "/api/v1/search/videos",
        }
    }

    fn search_url(&self, query: &SearchQuery) -> Result<Url, ExtractorError> {
        self.list_url(
            &self.base_url,
            Self::search_path(query),
            &[
                ("search", query.query.as_str()),
                ("sort", Self::sort_key(&query.sort_filter)),
            ],
        )
    }

    async fn load_search_page(&self, query: &SearchQuery, url: &Url) -> Result<ItemsPage, ExtractorError> {
        let (items, total) = match Self::search_path(query) {
            "/api/v1/search/video-channels" => {
                let list: ListResponse<Channel> = self.get_json(url.as_str()).await?;
                let items: Vec<InfoItem> = list
                    .data
                    .into_iter()
                    .map(|c| self.channel_item(c).into())
                    .collect();
                (items, list.total)
            }
            "/api/v1/search/video-playlists" => {
                let list: ListResponse<Playlist> = self.get_json(url.as_str()).await?;
                let items: Vec<InfoItem> = list
                    .data
                    .into_iter()
                    .map(|p| self.playlist_item(p).into())
                    .collect();
                (items, list.total)
            }
            _ => {
                let list: ListResponse<Video> = self.get_json(url.as_str()).await?;
                let items: Vec<InfoItem> = list
                    .data
                    .into_iter()
                    .map(|v| self.stream_item(v, &self.base_url).into())
                    .collect();
                (items, list.total)
            }
        };
        Ok(ItemsPage::new(items, Self::next_page(url, total)?))
    }

    async fn load_video_page(&self, url: &Url, origin: &str) -> Result<ItemsPage, ExtractorError> {
        let list: ListResponse<Video> = self.get_json(url.as_str()).await?;
        let items: Vec<InfoItem> = list
            .data
            .into_iter()
            .map(|v| self.stream_item(v, origin).into())
            .collect();
        Ok(ItemsPage::new(items, Self::next_page(url, list.total)?))
    }

    async fn load_playlist_page(&self, url: &Url, origin: &str) -> Result<ItemsPage, ExtractorError> {
        let list: ListResponse<PlaylistElement> = self.get_json(url.as_str()).await?;
        let items: Vec<InfoItem> = list
            .data
            .into_iter()
            .filter_map(|e| e.video)
            .map(|v| self.stream_item(v, origin).into())
            .collect();
        Ok(ItemsPage::new(items, Self::next_page(url, list.total)?))
    }

    /// Other videos sharing the first tag. Failures only cost the list.
    async fn related_items(&self, origin: &str, video: &Video) -> Vec<InfoItem> {
        let Some(tag) = video.tags.first() else {
            return Vec::new();
        };
        let url = match self.list_url(origin, "/api/v1/search/videos", &[("tagsOneOf", tag.as_str())]) {
            Ok(url) => url,
            Err(_) => return Vec::new(),
        };
        match self.get_json::<ListResponse<Video>>(url.as_str()).await {
            Ok(list) => list
                .data
                .into_iter()
                .filter(|v| v.uuid.is_some() && v.uuid != video.uuid)
                .map(|v| self.stream_item(v, origin).into())
                .collect(),
            Err(e) => {
                warn!(url = %url, error = %e, "Failed to load related videos");
                Vec::new()
            }
        }
    }

    fn images(origin: &str, images: &[ActorImage], legacy: Option<&ActorImage>) -> Vec<Image> {
        images
            .iter()
            .chain(legacy.filter(|_| images.is_empty()))
            .filter_map(|image| {
                let url = image
                    .file_url
                    .clone()
                    .or_else(|| image.path.as_deref().map(|p| join_url(origin, p)))?;
                Some(Image::new(
                    url,
                    image.width.unwrap_or(-1),
                    image.height.unwrap_or(-1),
                ))
            })
            .collect()
    }

    fn video_thumbnails(origin: &str, video: &Video) -> Vec<Image> {
        [video.thumbnail_path.as_deref(), video.preview_path.as_deref()]
            .into_iter()
            .flatten()
            .map(|path| Image::unknown_size(join_url(origin, path)))
            .collect()
    }

    fn video_url(origin: &str, video: &Video) -> String {
        video.url.clone().unwrap_or_else(|| {
            let id = video
                .short_uuid
                .as_deref()
                .or(video.uuid.as_deref())
                .unwrap_or_default();
            format!("{origin}/w/{id}")
        })
    }

    fn actor_url(origin: &str, actor: &ActorSummary, prefix: &str) -> Option<String> {
        actor
            .url
            .clone()
            .or_else(|| actor.name.as_deref().map(|n| format!("{origin}/{prefix}/{n}")))
    }

    fn stream_item(&self, video: Video, origin: &str) -> StreamInfoItem {
        let url = Self::video_url(origin, &video);
        let thumbnails = Self::video_thumbnails(origin, &video);
        let (uploader_url, uploader_name) = video
            .account
            .as_ref()
            .map(|a| (Self::actor_url(origin, a, "a"), a.display_name.clone()))
            .unwrap_or_default();
        StreamInfoItem {
            url,
            name: video.name.unwrap_or_default(),
            thumbnails,
            stream_type: if video.is_live {
                StreamType::LiveStream
            } else {
                StreamType::VideoStream
            },
            is_short_form: false,
            duration: video.duration,
            view_count: video.views,
            textual_upload_date: video.published_at,
            short_description: video.truncated_description.or(video.description),
            uploader_url,
            uploader_name,
            uploader_verified: false,
        }
    }

    fn channel_item(&self, channel: Channel) -> ChannelInfoItem {
        let origin = channel
            .url
            .as_deref()
            .and_then(|u| Self::origin_of(u).ok())
            .unwrap_or_else(|| self.base_url.clone());
        ChannelInfoItem {
            url: channel.url.clone().unwrap_or_else(|| {
                format!("{origin}/c/{}", channel.name.as_deref().unwrap_or_default())
            }),
            name: channel.display_name.unwrap_or_default(),
            thumbnails: Self::images(&origin, &channel.avatars, channel.avatar.as_ref()),
            description: channel.description,
            subscriber_count: channel.followers_count,
            stream_count: channel.videos_count.unwrap_or(-1),
            verified: false,
        }
    }

    fn playlist_item(&self, playlist: Playlist) -> PlaylistInfoItem {
        let origin = playlist
            .url
            .as_deref()
            .and_then(|u| Self::origin_of(u).ok())
            .unwrap_or_else(|| self.base_url.clone());
        let (uploader_url, uploader_name) = playlist
            .owner_account
            .as_ref()
            .map(|a| (Self::actor_url(&origin, a, "a"), a.display_name.clone()))
            .unwrap_or_default();
        PlaylistInfoItem {
            url: playlist.url.clone().unwrap_or_else(|| {
                let id = playlist
                    .short_uuid
                    .as_deref()
                    .or(playlist.uuid.as_deref())
                    .unwrap_or_default();
                format!("{origin}/w/p/{id}")
            }),
            name: playlist.display_name.unwrap_or_default(),
            thumbnails: playlist
                .thumbnail_path
                .as_deref()
                .map(|p| vec![Image::unknown_size(join_url(&origin, p))])
                .unwrap_or_default(),
            playlist_type: PlaylistType::Normal,
            description: playlist.description,
            stream_count: playlist.videos_length,
            uploader_url,
            uploader_name,
            uploader_verified: false,
        }
    }

    fn privacy(video: &Video) -> Privacy {
        match video.privacy.as_ref().and_then(|p| p.numeric_id()) {
            Some(1) => Privacy::Public,
            Some(2) => Privacy::Unlisted,
            Some(3) => Privacy::Private,
            Some(4) => Privacy::Internal,
            _ => Privacy::Other,
        }
    }

    /// Splits web-video and HLS files into video and audio-only renditions.
    fn renditions(video: &Video) -> (Vec<AudioStream>, Vec<VideoStream>) {
        let mut audio = Vec::new();
        let mut videos = Vec::new();

        let web_files = video.files.iter().map(|f| ("webvideo", f));
        let hls_files = video
            .streaming_playlists
            .iter()
            .flat_map(|p| p.files.iter().map(|f| ("hls", f)));

        for (delivery, file) in web_files.chain(hls_files) {
            let resolution = file.resolution.as_ref();
            let resolution_id = resolution.and_then(|r| r.numeric_id()).unwrap_or(-1);
            let label = resolution.and_then(|r| r.label.clone());
            let bitrate = Self::average_bitrate(file, video.duration);
            let id = Some(format!("{delivery}-{resolution_id}"));

            if resolution_id == 0 {
                audio.push(AudioStream {
                    id,
                    url: file.file_url.clone(),
                    codec: None,
                    quality: label,
                    bitrate,
                });
            } else {
                videos.push(VideoStream {
                    id,
                    url: file.file_url.clone(),
                    codec: None,
                    quality: label,
                    fps: file.fps.unwrap_or(-1),
                    width: file.width.unwrap_or(-1),
                    height: file
                        .height
                        .unwrap_or_else(|| Self::height_from_resolution(resolution_id)),
                    bitrate,
                });
            }
        }
        (audio, videos)
    }

    fn height_from_resolution(resolution_id: i64) -> i32 {
        if resolution_id <= 0 {
            return -1;
        }
        i32::try_from(resolution_id).unwrap_or(-1)
    }

    fn average_bitrate(file: &VideoFile, duration: i64) -> i32 {
        if duration <= 0 || file.size <= 0 {
            return -1;
        }
        i32::try_from(file.size.saturating_mul(8) / duration).unwrap_or(i32::MAX)
    }
}

#[async_trait]
impl MetadataProvider for PeerTube {
    fn service_id(&self) -> u32 {
        self.service_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn search_first_page(&self, query: &SearchQuery) -> Result<SearchInfo, ExtractorError> {
        let url = self.search_url(query)?;
        let page = self.load_search_page(query, &url).await?;
        Ok(SearchInfo {
            id: query.query.clone(),
            url: url.to_string(),
            name: query.query.clone(),
            service_id: self.service_id,
            sort_filter: Some(query.sort_filter.clone()),
            search_string: query.query.clone(),
            is_corrected: false,
            suggestion: None,
            page,
        })
    }

    async fn search_next_page(&self, query: &SearchQuery, page: &Page) -> Result<ItemsPage, ExtractorError> {
        let prefix = join_url(&self.base_url, Self::search_path(query));
        let url = Self::checked_page_url(page, &prefix)?;
        self.load_search_page(query, &url).await
    }

    async fn stream_detail(&self, url: &str) -> Result<StreamDetail, ExtractorError> {
        let id = capture_group_1_or_invalid_url(&VIDEO_URL_REGEX, url)?;
        let origin = Self::origin_of(url)?;
        let video: Video = self
            .get_json(&join_url(&origin, &format!("/api/v1/videos/{id}")))
            .await?;

        let related_items = self.related_items(&origin, &video).await;
        let (audio_streams, video_streams) = Self::renditions(&video);
        let privacy = Self::privacy(&video);
        let thumbnails = Self::video_thumbnails(&origin, &video);
        let host = video
            .account
            .as_ref()
            .and_then(|a| a.host.clone())
            .or_else(|| Url::parse(&origin).ok().and_then(|u| u.host_str().map(str::to_string)));
        let account = video.account.as_ref();
        let channel = video.channel.as_ref();

        Ok(StreamDetail {
            id: video.uuid.clone().unwrap_or_else(|| id.to_string()),
            url: Self::video_url(&origin, &video),
            name: video.name.clone().unwrap_or_default(),
            host,
            service_id: self.service_id,
            is_short_form: false,
            licence: video.licence.as_ref().and_then(|l| l.label.clone()),
            category: video.category.as_ref().and_then(|c| c.label.clone()),
            duration: video.duration,
            age_limit: if video.nsfw { 18 } else { 0 },
            view_count: video.views,
            like_count: video.likes,
            textual_upload_date: video.published_at.clone(),
            description: video.description.clone(),
            tags: video.tags.clone(),
            stream_type: if video.is_live {
                StreamType::LiveStream
            } else {
                StreamType::VideoStream
            },
            privacy,
            uploader_url: account.and_then(|a| Self::actor_url(&origin, a, "a")),
            uploader_name: account.and_then(|a| a.display_name.clone()),
            uploader_verified: false,
            uploader_subscriber_count: -1,
            sub_channel_url: channel.and_then(|c| Self::actor_url(&origin, c, "c")),
            sub_channel_name: channel.and_then(|c| c.display_name.clone()),
            thumbnails,
            audio_streams,
            video_streams,
            related_items,
        })
    }

    async fn channel_detail(&self, url: &str) -> Result<ChannelInfo, ExtractorError> {
        let caps = CHANNEL_URL_REGEX
            .captures(url)
            .ok_or_else(|| ExtractorError::InvalidUrl(url.to_string()))?;
        let is_account = matches!(&caps[1], "a" | "accounts");
        let name = &caps[2];
        let origin = Self::origin_of(url)?;

        let api_path = if is_account {
            format!("/api/v1/accounts/{name}")
        } else {
            format!("/api/v1/video-channels/{name}")
        };
        let channel: Channel = self.get_json(&join_url(&origin, &api_path)).await?;

        let feed_url = channel.id.map(|id| {
            let key = if is_account { "accountId" } else { "videoChannelId" };
            format!("{origin}/feeds/videos.xml?{key}={id}")
        });
        let (parent_channel_url, parent_channel_name) = channel
            .owner_account
            .as_ref()
            .map(|a| (Self::actor_url(&origin, a, "a"), a.display_name.clone()))
            .unwrap_or_default();

        Ok(ChannelInfo {
            id: channel.name.clone().unwrap_or_else(|| name.to_string()),
            url: channel.url.clone().unwrap_or_else(|| url.to_string()),
            name: channel.display_name.clone().unwrap_or_default(),
            service_id: self.service_id,
            feed_url,
            verified: false,
            subscriber_count: channel.followers_count,
            description: channel.description.clone(),
            tags: Vec::new(),
            avatars: Self::images(&origin, &channel.avatars, channel.avatar.as_ref()),
            banners: Self::images(&origin, &channel.banners, None),
            parent_channel_url,
            parent_channel_name,
        })
    }

    async fn playlist_first_page(&self, url: &str) -> Result<PlaylistInfo, ExtractorError> {
        let id = capture_group_1_or_invalid_url(&PLAYLIST_URL_REGEX, url)?;
        let origin = Self::origin_of(url)?;
        let playlist: Playlist = self
            .get_json(&join_url(&origin, &format!("/api/v1/video-playlists/{id}")))
            .await?;

        let items_url = self.list_url(&origin, &format!("/api/v1/video-playlists/{id}/videos"), &[])?;
        let page = self.load_playlist_page(&items_url, &origin).await?;

        let (sub_channel_url, sub_channel_name) = playlist
            .video_channel
            .as_ref()
            .map(|c| (Self::actor_url(&origin, c, "c"), c.display_name.clone()))
            .unwrap_or_default();
        let item = self.playlist_item(playlist);

        Ok(PlaylistInfo {
            id: id.to_string(),
            url: item.url,
            name: item.name,
            service_id: self.service_id,
            sort_filter: None,
            stream_count: item.stream_count,
            description: item.description,
            playlist_type: item.playlist_type,
            banners: Vec::new(),
            uploader_url: item.uploader_url,
            uploader_name: item.uploader_name,
            sub_channel_url,
            sub_channel_name,
            thumbnails: item.thumbnails,
            page,
        })
    }

    async fn playlist_next_page(&self, url: &str, page: &Page) -> Result<ItemsPage, ExtractorError> {
        let id = capture_group_1_or_invalid_url(&PLAYLIST_URL_REGEX, url)?;
        let origin = Self::origin_of(url)?;
        let prefix = join_url(&origin, &format!("/api/v1/video-playlists/{id}/videos"));
        let page_url = Self::checked_page_url(page, &prefix)?;
        self.load_playlist_page(&page_url, &origin).await
    }

    async fn trending_first_page(&self) -> Result<KioskInfo, ExtractorError> {
        let url = self.list_url(&self.base_url, "/api/v1/videos", &[("sort", "-trending")])?;
        let page = self.load_video_page(&url, &self.base_url).await?;
        Ok(KioskInfo {
            id: TRENDING_KIOSK_ID.to_string(),
            url: format!("{}/videos/trending", self.base_url),
            name: TRENDING_KIOSK_ID.to_string(),
            service_id: self.service_id,
            sort_filter: None,
            page,
        })
    }

    async fn trending_next_page(&self, page: &Page) -> Result<ItemsPage, ExtractorError> {
        let prefix = join_url(&self.base_url, "/api/v1/videos");
        let url = Self::checked_page_url(page, &prefix)?;
        self.load_video_page(&url, &self.base_url).await
    }
}
