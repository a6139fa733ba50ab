use super::image::Image;
use super::info_item::{InfoItem, StreamType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Privacy {
    #[default]
    Public,
    Unlisted,
    Private,
    Internal,
    Other,
}

/// An audio-only rendition of a stream.
#[derive(Debug, Clone, Default)]
pub struct AudioStream {
    pub id: Option<String>,
    pub url: Option<String>,
    pub codec: Option<String>,
    pub quality: Option<String>,
    /// Average bitrate in bits per second, `-1` when unknown.
    pub bitrate: i32,
}

/// A video rendition of a stream.
#[derive(Debug, Clone, Default)]
pub struct VideoStream {
    pub id: Option<String>,
    pub url: Option<String>,
    pub codec: Option<String>,
    pub quality: Option<String>,
    pub fps: i32,
    pub width: i32,
    pub height: i32,
    pub bitrate: i32,
}

/// Full detail of a single stream.
#[derive(Debug, Clone, Default)]
pub struct StreamDetail {
    pub id: String,
    pub url: String,
    pub name: String,
    pub host: Option<String>,
    pub service_id: u32,
    pub is_short_form: bool,
    pub licence: Option<String>,
    pub category: Option<String>,
    pub duration: i64,
    pub age_limit: i32,
    pub view_count: i64,
    pub like_count: i64,
    pub textual_upload_date: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub stream_type: StreamType,
    pub privacy: Privacy,
    pub uploader_url: Option<String>,
    pub uploader_name: Option<String>,
    pub uploader_verified: bool,
    pub uploader_subscriber_count: i64,
    pub sub_channel_url: Option<String>,
    pub sub_channel_name: Option<String>,
    pub thumbnails: Vec<Image>,
    pub audio_streams: Vec<AudioStream>,
    pub video_streams: Vec<VideoStream>,
    pub related_items: Vec<InfoItem>,
}
