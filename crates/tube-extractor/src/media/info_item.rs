use super::image::Image;

/// Kind of an [`InfoItem`], as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoType {
    Stream,
    Channel,
    Playlist,
    Comment,
}

/// How the content of a stream is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamType {
    #[default]
    None,
    VideoStream,
    AudioStream,
    LiveStream,
    AudioLiveStream,
    PostLiveStream,
    PostLiveAudioStream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaylistType {
    #[default]
    Normal,
    MixStream,
    MixMusic,
    MixChannel,
    MixGenre,
}

#[derive(Debug, Clone, Default)]
pub struct StreamInfoItem {
    pub url: String,
    pub name: String,
    pub thumbnails: Vec<Image>,
    pub stream_type: StreamType,
    pub is_short_form: bool,
    /// Duration in seconds, `-1` when unknown.
    pub duration: i64,
    /// View count, `-1` when unknown.
    pub view_count: i64,
    pub textual_upload_date: Option<String>,
    pub short_description: Option<String>,
    pub uploader_url: Option<String>,
    pub uploader_name: Option<String>,
    pub uploader_verified: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelInfoItem {
    pub url: String,
    pub name: String,
    pub thumbnails: Vec<Image>,
    pub description: Option<String>,
    pub subscriber_count: i64,
    pub stream_count: i64,
    pub verified: bool,
}

#[derive(Debug, Clone, Default)]
pub struct PlaylistInfoItem {
    pub url: String,
    pub name: String,
    pub thumbnails: Vec<Image>,
    pub playlist_type: PlaylistType,
    pub description: Option<String>,
    pub stream_count: i64,
    pub uploader_url: Option<String>,
    pub uploader_name: Option<String>,
    pub uploader_verified: bool,
}

/// An item the provider returned without a more specific shape.
#[derive(Debug, Clone)]
pub struct GenericInfoItem {
    pub url: String,
    pub name: String,
    pub info_type: InfoType,
    pub thumbnails: Vec<Image>,
}

/// One entry of a search result, listing, or related-items list.
#[derive(Debug, Clone)]
pub enum InfoItem {
    Stream(StreamInfoItem),
    Channel(ChannelInfoItem),
    Playlist(PlaylistInfoItem),
    Generic(GenericInfoItem),
}

impl InfoItem {
    pub fn url(&self) -> &str {
        match self {
            InfoItem::Stream(item) => &item.url,
            InfoItem::Channel(item) => &item.url,
            InfoItem::Playlist(item) => &item.url,
            InfoItem::Generic(item) => &item.url,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            InfoItem::Stream(item) => &item.name,
            InfoItem::Channel(item) => &item.name,
            InfoItem::Playlist(item) => &item.name,
            InfoItem::Generic(item) => &item.name,
        }
    }

    pub fn info_type(&self) -> InfoType {
        match self {
            InfoItem::Stream(_) => InfoType::Stream,
            InfoItem::Channel(_) => InfoType::Channel,
            InfoItem::Playlist(_) => InfoType::Playlist,
            InfoItem::Generic(item) => item.info_type,
        }
    }

    pub fn thumbnails(&self) -> &[Image] {
        match self {
            InfoItem::Stream(item) => &item.thumbnails,
            InfoItem::Channel(item) => &item.thumbnails,
            InfoItem::Playlist(item) => &item.thumbnails,
            InfoItem::Generic(item) => &item.thumbnails,
        }
    }
}

impl From<StreamInfoItem> for InfoItem {
    fn from(item: StreamInfoItem) -> Self {
        InfoItem::Stream(item)
    }
}

impl From<ChannelInfoItem> for InfoItem {
    fn from(item: ChannelInfoItem) -> Self {
        InfoItem::Channel(item)
    }
}

impl From<PlaylistInfoItem> for InfoItem {
    fn from(item: PlaylistInfoItem) -> Self {
        InfoItem::Playlist(item)
    }
}
