use crate::extractor::page::Page;

use super::image::Image;
use super::info_item::{InfoItem, PlaylistType};

/// A batch of items plus the cursor for the batch after it.
#[derive(Debug, Clone, Default)]
pub struct ItemsPage {
    pub items: Vec<InfoItem>,
    pub next_page: Option<Page>,
}

impl ItemsPage {
    pub fn new(items: Vec<InfoItem>, next_page: Option<Page>) -> Self {
        Self { items, next_page }
    }

    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}

/// First page of a search.
#[derive(Debug, Clone, Default)]
pub struct SearchInfo {
    pub id: String,
    pub url: String,
    pub name: String,
    pub service_id: u32,
    pub sort_filter: Option<String>,
    pub search_string: String,
    pub is_corrected: bool,
    pub suggestion: Option<String>,
    pub page: ItemsPage,
}

#[derive(Debug, Clone, Default)]
pub struct ChannelInfo {
    pub id: String,
    pub url: String,
    pub name: String,
    pub service_id: u32,
    pub feed_url: Option<String>,
    pub verified: bool,
    pub subscriber_count: i64,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub avatars: Vec<Image>,
    pub banners: Vec<Image>,
    pub parent_channel_url: Option<String>,
    pub parent_channel_name: Option<String>,
}

/// First page of a playlist.
#[derive(Debug, Clone, Default)]
pub struct PlaylistInfo {
    pub id: String,
    pub url: String,
    pub name: String,
    pub service_id: u32,
    pub sort_filter: Option<String>,
    pub stream_count: i64,
    pub description: Option<String>,
    pub playlist_type: PlaylistType,
    pub banners: Vec<Image>,
    pub uploader_url: Option<String>,
    pub uploader_name: Option<String>,
    pub sub_channel_url: Option<String>,
    pub sub_channel_name: Option<String>,
    pub thumbnails: Vec<Image>,
    pub page: ItemsPage,
}

/// First page of a kiosk feed such as trending.
#[derive(Debug, Clone, Default)]
pub struct KioskInfo {
    pub id: String,
    pub url: String,
    pub name: String,
    pub service_id: u32,
    pub sort_filter: Option<String>,
    pub page: ItemsPage,
}
