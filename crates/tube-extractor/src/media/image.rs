/// Sentinel used for a dimension the platform does not report.
pub const DIMENSION_UNKNOWN: i32 = -1;

/// A thumbnail, avatar or banner image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub url: String,
    pub width: i32,
    pub height: i32,
}

impl Image {
    pub fn new(url: impl Into<String>, width: i32, height: i32) -> Self {
        Self {
            url: url.into(),
            width,
            height,
        }
    }

    /// An image whose dimensions are not known.
    pub fn unknown_size(url: impl Into<String>) -> Self {
        Self::new(url, DIMENSION_UNKNOWN, DIMENSION_UNKNOWN)
    }
}
