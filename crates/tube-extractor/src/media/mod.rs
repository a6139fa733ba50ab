pub mod image;
pub mod info_item;
pub mod list_info;
pub mod stream_info;

pub use image::Image;
pub use info_item::{
    ChannelInfoItem, GenericInfoItem, InfoItem, InfoType, PlaylistInfoItem, PlaylistType,
    StreamInfoItem, StreamType,
};
pub use list_info::{ChannelInfo, ItemsPage, KioskInfo, PlaylistInfo, SearchInfo};
pub use stream_info::{AudioStream, Privacy, StreamDetail, VideoStream};
