use async_trait::async_trait;

use super::error::ExtractorError;
use super::page::Page;
use crate::media::{ChannelInfo, ItemsPage, KioskInfo, PlaylistInfo, SearchInfo, StreamDetail};

/// A search request as understood by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub content_filters: Vec<String>,
    pub sort_filter: String,
}

impl SearchQuery {
    pub const DEFAULT_CONTENT_FILTER: &'static str = "videos";
    pub const DEFAULT_SORT_FILTER: &'static str = "relevance";

    /// Builds a query from raw request values.
    ///
    /// An absent or empty filter list means `videos`; an absent or empty sort
    /// key means `relevance`. Filters are split on `,` as given.
    pub fn new(query: impl Into<String>, filters: Option<&str>, sort: Option<&str>) -> Self {
        let content_filters = match filters {
            Some(f) if !f.is_empty() => f.split(',').map(str::to_string).collect(),
            _ => vec![Self::DEFAULT_CONTENT_FILTER.to_string()],
        };
        let sort_filter = match sort {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => Self::DEFAULT_SORT_FILTER.to_string(),
        };
        Self {
            query: query.into(),
            content_filters,
            sort_filter,
        }
    }
}

/// A platform that can resolve queries and urls into metadata.
///
/// First-page operations return the full entity (basic fields, the first item
/// batch, and a cursor when more items exist). Next-page operations take a
/// cursor previously produced by the same provider and return only the batch.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Index of this provider in the [`ServiceRegistry`](super::registry::ServiceRegistry).
    fn service_id(&self) -> u32;

    /// Human readable name, used in logs.
    fn name(&self) -> &str;

    async fn search_first_page(&self, query: &SearchQuery) -> Result<SearchInfo, ExtractorError>;

    async fn search_next_page(
        &self,
        query: &SearchQuery,
        page: &Page,
    ) -> Result<ItemsPage, ExtractorError>;

    async fn stream_detail(&self, url: &str) -> Result<StreamDetail, ExtractorError>;

    async fn channel_detail(&self, url: &str) -> Result<ChannelInfo, ExtractorError>;

    async fn playlist_first_page(&self, url: &str) -> Result<PlaylistInfo, ExtractorError>;

    async fn playlist_next_page(&self, url: &str, page: &Page)
    -> Result<ItemsPage, ExtractorError>;

    async fn trending_first_page(&self) -> Result<KioskInfo, ExtractorError>;

    async fn trending_next_page(&self, page: &Page) -> Result<ItemsPage, ExtractorError>;
}
