use serde::Deserialize;

/// `{ total, data }` envelope used by every PeerTube list endpoint.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub total: i64,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct Labeled {
    pub id: Option<serde_json::Value>,
    pub label: Option<String>,
}

impl Labeled {
    pub fn numeric_id(&self) -> Option<i64> {
        self.id.as_ref().and_then(|v| v.as_i64())
    }
}

#[derive(Debug, Deserialize)]
pub struct ActorImage {
    pub path: Option<String>,
    #[serde(rename = "fileUrl")]
    pub file_url: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorSummary {
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub url: Option<String>,
    pub host: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub uuid: Option<String>,
    pub short_uuid: Option<String>,
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub truncated_description: Option<String>,
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub views: i64,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default)]
    pub nsfw: bool,
    pub published_at: Option<String>,
    pub thumbnail_path: Option<String>,
    pub preview_path: Option<String>,
    pub account: Option<ActorSummary>,
    pub channel: Option<ActorSummary>,
    pub privacy: Option<Labeled>,
    pub category: Option<Labeled>,
    pub licence: Option<Labeled>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub files: Vec<VideoFile>,
    #[serde(default)]
    pub streaming_playlists: Vec<StreamingPlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoFile {
    pub resolution: Option<Labeled>,
    #[serde(default)]
    pub size: i64,
    pub file_url: Option<String>,
    pub fps: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamingPlaylist {
    #[serde(default)]
    pub files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub followers_count: i64,
    pub videos_count: Option<i64>,
    #[serde(default)]
    pub avatars: Vec<ActorImage>,
    /// Instances older than v4 expose a single avatar.
    pub avatar: Option<ActorImage>,
    #[serde(default)]
    pub banners: Vec<ActorImage>,
    pub owner_account: Option<ActorSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub uuid: Option<String>,
    pub short_uuid: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub videos_length: i64,
    pub thumbnail_path: Option<String>,
    pub owner_account: Option<ActorSummary>,
    pub video_channel: Option<ActorSummary>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistElement {
    pub video: Option<Video>,
}
