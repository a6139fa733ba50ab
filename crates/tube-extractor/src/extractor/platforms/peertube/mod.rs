mod builder;
mod models;

pub use builder::PeerTube;
pub use builder::{CHANNEL_URL_REGEX, PLAYLIST_URL_REGEX, VIDEO_URL_REGEX};
