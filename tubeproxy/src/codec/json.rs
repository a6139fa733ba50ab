//! Response body encoding.
//!
//! Bodies are assembled by hand so the exact field order and escaping stay
//! fixed: `"`, `\`, backspace, form feed, newline, carriage return and tab get
//! their two-character escapes, other control characters below U+0020 become
//! `\u00xx`, and everything else (non-ASCII included) is copied through.

use std::fmt::Write;

use tube_extractor::media::{
    AudioStream, ChannelInfo, ChannelInfoItem, GenericInfoItem, Image, InfoItem, InfoType,
    ItemsPage, KioskInfo, PlaylistInfo, PlaylistInfoItem, PlaylistType, Privacy, SearchInfo,
    StreamDetail, StreamInfoItem, StreamType, VideoStream,
};

/// Appends `value` as a quoted JSON string.
pub fn escape_into(out: &mut String, value: &str) {
    out.reserve(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

/// Quoted string, or bare `null` when absent.
pub fn string(value: Option<&str>) -> String {
    match value {
        Some(v) => {
            let mut out = String::new();
            escape_into(&mut out, v);
            out
        }
        None => "null".to_string(),
    }
}

/// Joins already-encoded values into a JSON array.
pub fn array<I>(values: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut out = String::from("[");
    for (i, value) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&value);
    }
    out.push(']');
    out
}

/// Incremental writer for one JSON object; keys are emitted in call order.
#[derive(Debug)]
pub struct ObjectWriter {
    buf: String,
    empty: bool,
}

impl Default for ObjectWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self {
            buf: String::from("{"),
            empty: true,
        }
    }

    fn key(&mut self, key: &str) {
        if !self.empty {
            self.buf.push(',');
        }
        self.empty = false;
        escape_into(&mut self.buf, key);
        self.buf.push(':');
    }

    pub fn str(mut self, key: &str, value: &str) -> Self {
        self.key(key);
        escape_into(&mut self.buf, value);
        self
    }

    pub fn opt_str(mut self, key: &str, value: Option<&str>) -> Self {
        self.key(key);
        match value {
            Some(v) => escape_into(&mut self.buf, v),
            None => self.buf.push_str("null"),
        }
        self
    }

    pub fn int(mut self, key: &str, value: i64) -> Self {
        self.key(key);
        let _ = write!(self.buf, "{value}");
        self
    }

    pub fn bool(mut self, key: &str, value: bool) -> Self {
        self.key(key);
        self.buf.push_str(if value { "true" } else { "false" });
        self
    }

    /// Writes a value that is already valid JSON.
    pub fn raw(mut self, key: &str, json: &str) -> Self {
        self.key(key);
        self.buf.push_str(json);
        self
    }

    pub fn finish(mut self) -> String {
        self.buf.push('}');
        self.buf
    }
}

pub fn stream_type(kind: StreamType) -> &'static str {
    match kind {
        StreamType::None => "none",
        StreamType::LiveStream => "live",
        StreamType::AudioStream => "audio",
        StreamType::VideoStream => "video",
        StreamType::PostLiveStream => "post_live",
        StreamType::AudioLiveStream => "audio_live",
        StreamType::PostLiveAudioStream => "post_live_audio",
    }
}

pub fn privacy(privacy: Privacy) -> &'static str {
    match privacy {
        Privacy::Other => "other",
        Privacy::Public => "public",
        Privacy::Private => "private",
        Privacy::Internal => "internal",
        Privacy::Unlisted => "unlisted",
    }
}

pub fn playlist_type(kind: PlaylistType) -> &'static str {
    match kind {
        PlaylistType::Normal => "normal",
        PlaylistType::MixGenre => "mix_genre",
        PlaylistType::MixMusic => "mix_music",
        PlaylistType::MixStream => "mix_stream",
        PlaylistType::MixChannel => "mix_channel",
    }
}

pub fn info_type(kind: InfoType) -> &'static str {
    match kind {
        InfoType::Stream => "stream",
        InfoType::Channel => "channel",
        InfoType::Comment => "comment",
        InfoType::Playlist => "playlist",
    }
}

pub fn image(image: &Image) -> String {
    ObjectWriter::new()
        .str("url", &image.url)
        .int("width", image.width.into())
        .int("height", image.height.into())
        .finish()
}

pub fn images(images: &[Image]) -> String {
    array(images.iter().map(image))
}

fn strings(values: &[String]) -> String {
    array(values.iter().map(|v| string(Some(v))))
}

/// `{url, name}` sub-object; both keys are always present.
fn link(url: Option<&str>, name: Option<&str>) -> String {
    ObjectWriter::new()
        .opt_str("url", url)
        .opt_str("name", name)
        .finish()
}

fn uploader(url: Option<&str>, name: Option<&str>, verified: bool) -> String {
    ObjectWriter::new()
        .opt_str("url", url)
        .opt_str("name", name)
        .bool("verified", verified)
        .finish()
}

pub fn stream_item(item: &StreamInfoItem) -> String {
    ObjectWriter::new()
        .str("url", &item.url)
        .str("name", &item.name)
        .str("type", info_type(InfoType::Stream))
        .bool("short", item.is_short_form)
        .str("stream", stream_type(item.stream_type))
        .int("duration", item.duration)
        .int("viewCount", item.view_count)
        .opt_str("uploadDate", item.textual_upload_date.as_deref())
        .opt_str("description", item.short_description.as_deref())
        .raw(
            "uploader",
            &uploader(
                item.uploader_url.as_deref(),
                item.uploader_name.as_deref(),
                item.uploader_verified,
            ),
        )
        .raw("thumbnails", &images(&item.thumbnails))
        .finish()
}

pub fn channel_item(item: &ChannelInfoItem) -> String {
    ObjectWriter::new()
        .str("url", &item.url)
        .str("name", &item.name)
        .str("type", info_type(InfoType::Channel))
        .int("streams", item.stream_count)
        .bool("verified", item.verified)
        .int("subscribers", item.subscriber_count)
        .opt_str("description", item.description.as_deref())
        .raw("thumbnails", &images(&item.thumbnails))
        .finish()
}

pub fn playlist_item(item: &PlaylistInfoItem) -> String {
    ObjectWriter::new()
        .str("url", &item.url)
        .str("name", &item.name)
        .str("type", info_type(InfoType::Playlist))
        .int("streams", item.stream_count)
        .str("playlist", playlist_type(item.playlist_type))
        .opt_str("description", item.description.as_deref())
        .raw(
            "uploader",
            &uploader(
                item.uploader_url.as_deref(),
                item.uploader_name.as_deref(),
                item.uploader_verified,
            ),
        )
        .raw("thumbnails", &images(&item.thumbnails))
        .finish()
}

pub fn generic_item(item: &GenericInfoItem) -> String {
    ObjectWriter::new()
        .str("url", &item.url)
        .str("name", &item.name)
        .str("type", info_type(item.info_type))
        .raw("thumbnails", &images(&item.thumbnails))
        .finish()
}

pub fn info_item(item: &InfoItem) -> String {
    match item {
        InfoItem::Stream(item) => stream_item(item),
        InfoItem::Channel(item) => channel_item(item),
        InfoItem::Playlist(item) => playlist_item(item),
        InfoItem::Generic(item) => generic_item(item),
    }
}

pub fn info_items(items: &[InfoItem]) -> String {
    array(items.iter().map(info_item))
}

fn audio_stream(stream: &AudioStream) -> String {
    ObjectWriter::new()
        .opt_str("id", stream.id.as_deref())
        .opt_str("url", stream.url.as_deref())
        .opt_str("codec", stream.codec.as_deref())
        .opt_str("quality", stream.quality.as_deref())
        .int("bitrate", stream.bitrate.into())
        .finish()
}

fn video_stream(stream: &VideoStream) -> String {
    ObjectWriter::new()
        .opt_str("id", stream.id.as_deref())
        .opt_str("url", stream.url.as_deref())
        .int("fps", stream.fps.into())
        .opt_str("codec", stream.codec.as_deref())
        .int("width", stream.width.into())
        .int("height", stream.height.into())
        .int("bitrate", stream.bitrate.into())
        .opt_str("quality", stream.quality.as_deref())
        .finish()
}

/// `{nextPageToken, results}` body of a next-page request.
pub fn items_page(page: &ItemsPage, next_page_token: Option<&str>) -> String {
    ObjectWriter::new()
        .opt_str("nextPageToken", next_page_token)
        .raw("results", &info_items(&page.items))
        .finish()
}

pub fn search_info(info: &SearchInfo, next_page_token: Option<&str>) -> String {
    ObjectWriter::new()
        .str("id", &info.id)
        .str("url", &info.url)
        .str("name", &info.name)
        .opt_str("sort", info.sort_filter.as_deref())
        .str("query", &info.search_string)
        .int("service", info.service_id.into())
        .bool("corrected", info.is_corrected)
        .opt_str("suggestion", info.suggestion.as_deref())
        .opt_str("nextPageToken", next_page_token)
        .raw("results", &info_items(&info.page.items))
        .finish()
}

pub fn stream_detail(info: &StreamDetail) -> String {
    let uploader = ObjectWriter::new()
        .opt_str("url", info.uploader_url.as_deref())
        .opt_str("name", info.uploader_name.as_deref())
        .bool("verified", info.uploader_verified)
        .int("subscribers", info.uploader_subscriber_count)
        .finish();

    ObjectWriter::new()
        .str("id", &info.id)
        .str("url", &info.url)
        .str("name", &info.name)
        .opt_str("host", info.host.as_deref())
        .bool("short", info.is_short_form)
        .int("service", info.service_id.into())
        .opt_str("license", info.licence.as_deref())
        .opt_str("category", info.category.as_deref())
        .int("duration", info.duration)
        .int("ageLimit", info.age_limit.into())
        .int("viewCount", info.view_count)
        .int("likeCount", info.like_count)
        .opt_str("uploadDate", info.textual_upload_date.as_deref())
        .opt_str("description", info.description.as_deref())
        .raw("tags", &strings(&info.tags))
        .str("stream", stream_type(info.stream_type))
        .str("privacy", privacy(info.privacy))
        .raw("uploader", &uploader)
        .raw(
            "subchannel",
            &link(info.sub_channel_url.as_deref(), info.sub_channel_name.as_deref()),
        )
        .raw("thumbnails", &images(&info.thumbnails))
        .raw("audioStreams", &array(info.audio_streams.iter().map(audio_stream)))
        .raw("videoStreams", &array(info.video_streams.iter().map(video_stream)))
        .raw("relatedItems", &info_items(&info.related_items))
        .finish()
}

pub fn channel_info(info: &ChannelInfo) -> String {
    ObjectWriter::new()
        .str("id", &info.id)
        .str("url", &info.url)
        .str("name", &info.name)
        .opt_str("feed", info.feed_url.as_deref())
        .int("service", info.service_id.into())
        .bool("verified", info.verified)
        .int("subscribers", info.subscriber_count)
        .opt_str("description", info.description.as_deref())
        .raw("tags", &strings(&info.tags))
        .raw("avatars", &images(&info.avatars))
        .raw("banners", &images(&info.banners))
        .raw(
            "parentChannel",
            &link(
                info.parent_channel_url.as_deref(),
                info.parent_channel_name.as_deref(),
            ),
        )
        .finish()
}

pub fn playlist_info(info: &PlaylistInfo, next_page_token: Option<&str>) -> String {
    ObjectWriter::new()
        .str("id", &info.id)
        .str("url", &info.url)
        .str("name", &info.name)
        .opt_str("sort", info.sort_filter.as_deref())
        .int("streams", info.stream_count)
        .int("service", info.service_id.into())
        .opt_str("description", info.description.as_deref())
        .opt_str("nextPageToken", next_page_token)
        .str("playlist", playlist_type(info.playlist_type))
        .raw("banners", &images(&info.banners))
        .raw(
            "uploader",
            &link(info.uploader_url.as_deref(), info.uploader_name.as_deref()),
        )
        .raw(
            "subchannel",
            &link(info.sub_channel_url.as_deref(), info.sub_channel_name.as_deref()),
        )
        .raw("thumbnails", &images(&info.thumbnails))
        .raw("results", &info_items(&info.page.items))
        .finish()
}

pub fn kiosk_info(info: &KioskInfo, next_page_token: Option<&str>) -> String {
    ObjectWriter::new()
        .str("id", &info.id)
        .str("url", &info.url)
        .str("name", &info.name)
        .opt_str("sort", info.sort_filter.as_deref())
        .int("service", info.service_id.into())
        .opt_str("nextPageToken", next_page_token)
        .raw("results", &info_items(&info.page.items))
        .finish()
}
