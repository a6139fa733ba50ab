//! Metadata provider boundary used by the tubeproxy gateway.
//!
//! The crate defines the entities a provider produces ([`media`]), the
//! [`MetadataProvider`](extractor::provider::MetadataProvider) trait, the fixed
//! [`ServiceRegistry`](extractor::registry::ServiceRegistry) that maps service
//! ids to providers, and the outbound HTTP [`Downloader`](extractor::downloader::Downloader)
//! that providers use to talk to the platforms.

pub mod extractor;
pub mod media;

pub use extractor::downloader::{Downloader, HttpDownloader, ProxySetting};
pub use extractor::error::ExtractorError;
pub use extractor::page::Page;
pub use extractor::provider::{MetadataProvider, SearchQuery};
pub use extractor::registry::ServiceRegistry;
