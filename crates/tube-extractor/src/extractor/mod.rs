pub mod downloader;
pub mod error;
pub mod page;
pub mod platforms;
pub mod provider;
pub mod registry;
pub(crate) mod utils;

pub use downloader::{Downloader, HttpDownloader, ProxySetting};
